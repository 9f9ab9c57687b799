use ledger::ReferralRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// 登记推荐链接的请求体
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
pub struct RegisterReferralDto {
    /// 推荐人钱包地址
    #[validate(length(min = 1))]
    pub address: String,
}

/// 兑换推荐的请求体
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
pub struct UseReferralDto {
    /// 推荐人钱包地址
    #[validate(length(min = 1))]
    pub referrer: String,
    /// 被推荐人钱包地址
    #[validate(length(min = 1))]
    pub referee: String,
    /// 领水凭证
    #[validate(length(min = 1))]
    pub faucet_token: String,
}

/// 领水计分的请求体
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
pub struct UseFaucetDto {
    /// 领水钱包地址
    #[validate(length(min = 1))]
    pub referee: String,
    /// 领水凭证
    #[validate(length(min = 1))]
    pub faucet_token: String,
}

#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Clone, Serialize, Debug, ToSchema)]
pub struct UseReferralResponse {
    pub message: String,
    /// 推荐人获得的积分，固定0.01
    #[schema(value_type = f64)]
    pub referrer_earned: Decimal,
    /// 被推荐人获得的积分，固定0.01
    #[schema(value_type = f64)]
    pub referee_earned: Decimal,
}

/// 领水计分结果。未被推荐的钱包领水是合法操作，只是不产生积分，
/// 此时仅返回message。
#[derive(Clone, Serialize, Debug, ToSchema)]
pub struct UseFaucetResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub points_earned: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub total_points: Option<Decimal>,
}

#[derive(Clone, Serialize, Debug, ToSchema)]
pub struct ReferralStatusResponse {
    pub referrer: String,
    #[schema(value_type = f64)]
    pub total_points: Decimal,
    #[schema(value_type = f64)]
    pub total_paid: Decimal,
    #[schema(value_type = f64)]
    pub total_unpaid: Decimal,
    pub referrals: Vec<ReferralRecord>,
}
