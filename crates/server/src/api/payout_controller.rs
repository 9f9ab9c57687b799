use crate::{
    dtos::payout_dto::{MarkPaidResponse, PayoutListResponse},
    services::Services,
};
use axum::{
    http::HeaderMap,
    routing::{get, post},
    Extension, Json, Router,
};
use utils::{AppError, AppResult};

/// 获取批量转账列表
///
/// 只读：列出所有正积分记录对应的(wallet, amount)
#[utoipa::path(
    get,
    path = "/api/payout-list",
    tag = "payout",
    responses(
        (status = 200, description = "成功返回转账列表", body = PayoutListResponse)
    )
)]
pub async fn payout_list(Extension(services): Extension<Services>) -> AppResult<Json<PayoutListResponse>> {
    let list = services.payout.payout_list().await?;

    Ok(Json(list))
}

/// 结算所有未支付积分
///
/// 管理接口：X-Secret-Key请求头必须等于配置的管理密钥
#[utoipa::path(
    post,
    path = "/api/mark-paid",
    tag = "payout",
    responses(
        (status = 200, description = "结算完成", body = MarkPaidResponse),
        (status = 401, description = "管理密钥错误")
    )
)]
pub async fn mark_paid(Extension(services): Extension<Services>, headers: HeaderMap) -> AppResult<Json<MarkPaidResponse>> {
    let provided = headers.get("x-secret-key").and_then(|v| v.to_str().ok()).unwrap_or_default();
    if provided != services.config.secret_key {
        return Err(AppError::Unauthorized("invalid X-Secret-Key header".to_string()));
    }

    let summary = services.payout.mark_paid().await?;

    Ok(Json(MarkPaidResponse {
        message: "All unpaid referrals marked as paid".to_string(),
        summary,
    }))
}

pub struct PayoutController;
impl PayoutController {
    pub fn app() -> Router {
        Router::new()
            .route("/payout-list", get(payout_list))
            .route("/mark-paid", post(mark_paid))
    }
}
