pub mod payout_dto;
pub mod referral_dto;
