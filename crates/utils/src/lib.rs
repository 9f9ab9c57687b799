pub mod address;
pub mod config;
pub mod errors;
pub mod logger;

pub use address::*;
pub use config::EnvLoader;
pub use config::*;
pub use errors::*;
pub use logger::*;
