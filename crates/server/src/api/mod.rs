pub mod payout_controller;
pub mod referral_controller;


use axum::{response::IntoResponse, routing::get, Json, Router};
use serde_json::json;

/// 系统健康检查
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "服务器运行正常")
    ),
    tag = "系统状态"
)]
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "Backend rodando" }))
}

pub fn app() -> Router {
    Router::new()
        .merge(referral_controller::ReferralController::app())
        .merge(payout_controller::PayoutController::app())
}
