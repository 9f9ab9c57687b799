pub mod api;
pub mod app;
pub mod docs;
pub mod dtos;
pub mod extractors;
pub mod middleware;
pub mod router;
pub mod services;
