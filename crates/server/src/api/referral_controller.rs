use crate::{
    dtos::referral_dto::{
        MessageResponse, ReferralStatusResponse, RegisterReferralDto, UseFaucetDto, UseReferralDto, UseReferralResponse,
        UseFaucetResponse,
    },
    extractors::ValidationExtractor,
    services::{referral::referral_service::FaucetOutcome, Services},
};
use axum::{
    extract::Path,
    routing::{get, post},
    Extension, Json, Router,
};
use utils::AppResult;

/// 登记推荐链接
///
/// 幂等：重复登记同一地址不是错误
#[utoipa::path(
    post,
    path = "/api/register-referral",
    tag = "referral",
    request_body = RegisterReferralDto,
    responses(
        (status = 200, description = "登记成功", body = MessageResponse),
        (status = 400, description = "地址格式错误")
    )
)]
pub async fn register_referral(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<RegisterReferralDto>,
) -> AppResult<Json<MessageResponse>> {
    services.referral.register(&req.address).await?;

    Ok(Json(MessageResponse {
        message: "Referral link registered".to_string(),
    }))
}

/// 兑换推荐
///
/// 推荐人与被推荐人各计0.01积分，每个钱包终身只能被推荐一次
#[utoipa::path(
    post,
    path = "/api/use-referral",
    tag = "referral",
    request_body = UseReferralDto,
    responses(
        (status = 200, description = "兑换成功", body = UseReferralResponse),
        (status = 400, description = "地址错误 / 已被推荐 / 超出推荐上限"),
        (status = 401, description = "领水凭证错误"),
        (status = 429, description = "超出每分钟限额")
    )
)]
pub async fn use_referral(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<UseReferralDto>,
) -> AppResult<Json<UseReferralResponse>> {
    let outcome = services.referral.redeem(&req.referrer, &req.referee, &req.faucet_token).await?;

    Ok(Json(UseReferralResponse {
        message: "Referral redeemed".to_string(),
        referrer_earned: outcome.referrer_earned,
        referee_earned: outcome.referee_earned,
    }))
}

/// 领水计分
///
/// 被推荐钱包领水时给其推荐记录加0.01；未被推荐的钱包领水
/// 是合法操作，返回无奖励的成功结果
#[utoipa::path(
    post,
    path = "/api/use-faucet",
    tag = "referral",
    request_body = UseFaucetDto,
    responses(
        (status = 200, description = "计分成功或无奖励", body = UseFaucetResponse),
        (status = 400, description = "地址格式错误"),
        (status = 401, description = "领水凭证错误"),
        (status = 429, description = "超出每分钟限额")
    )
)]
pub async fn use_faucet(
    Extension(services): Extension<Services>,
    ValidationExtractor(req): ValidationExtractor<UseFaucetDto>,
) -> AppResult<Json<UseFaucetResponse>> {
    let outcome = services.referral.credit_faucet(&req.referee, &req.faucet_token).await?;

    let response = match outcome {
        FaucetOutcome::Credited {
            referrer,
            points_earned,
            total_points,
        } => UseFaucetResponse {
            message: "Faucet usage credited".to_string(),
            referrer: Some(referrer),
            points_earned: Some(points_earned),
            total_points: Some(total_points),
        },
        FaucetOutcome::NotReferred => UseFaucetResponse {
            message: "Faucet used, no referral reward".to_string(),
            referrer: None,
            points_earned: None,
            total_points: None,
        },
    };

    Ok(Json(response))
}

/// 查询某推荐人的积分状态
#[utoipa::path(
    get,
    path = "/api/referral-status/{address}",
    tag = "referral",
    params(
        ("address" = String, Path, description = "推荐人钱包地址")
    ),
    responses(
        (status = 200, description = "成功返回积分聚合", body = ReferralStatusResponse)
    )
)]
pub async fn referral_status(
    Extension(services): Extension<Services>,
    Path(address): Path<String>,
) -> AppResult<Json<ReferralStatusResponse>> {
    let address = address.to_lowercase();
    let aggregate = services.referral.status(&address).await?;

    Ok(Json(ReferralStatusResponse {
        referrer: address,
        total_points: aggregate.total_points,
        total_paid: aggregate.total_paid,
        total_unpaid: aggregate.total_unpaid,
        referrals: aggregate.referrals,
    }))
}

pub struct ReferralController;
impl ReferralController {
    pub fn app() -> Router {
        Router::new()
            .route("/register-referral", post(register_referral))
            .route("/use-referral", post(use_referral))
            .route("/use-faucet", post(use_faucet))
            .route("/referral-status/:address", get(referral_status))
    }
}
