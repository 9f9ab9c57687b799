use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OMMV Referral Reward Backend API",
        description = "推荐奖励账本后端：登记/兑换推荐、领水计分、查询余额与批量结算",
        version = "1.0.0"
    ),
    paths(
        // System health check
        crate::api::health,
        // Referral endpoints
        crate::api::referral_controller::register_referral,
        crate::api::referral_controller::use_referral,
        crate::api::referral_controller::use_faucet,
        crate::api::referral_controller::referral_status,
        // Payout endpoints
        crate::api::payout_controller::payout_list,
        crate::api::payout_controller::mark_paid,
    ),
    components(
        schemas(
            // Ledger models
            ledger::ReferralRecord,
            ledger::PaidRecord,
            // DTOs
            crate::dtos::referral_dto::RegisterReferralDto,
            crate::dtos::referral_dto::UseReferralDto,
            crate::dtos::referral_dto::UseFaucetDto,
            crate::dtos::referral_dto::MessageResponse,
            crate::dtos::referral_dto::UseReferralResponse,
            crate::dtos::referral_dto::UseFaucetResponse,
            crate::dtos::referral_dto::ReferralStatusResponse,
            crate::dtos::payout_dto::MultisendEntry,
            crate::dtos::payout_dto::PayoutListResponse,
            crate::dtos::payout_dto::SettledEntry,
            crate::dtos::payout_dto::MarkPaidResponse,
        )
    ),
    tags(
        (name = "referral", description = "推荐关系与积分"),
        (name = "payout", description = "结算与批量转账"),
        (name = "系统状态", description = "健康检查")
    )
)]
pub struct ApiDoc;
