pub mod payout_service;
