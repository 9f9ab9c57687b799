use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 批量转账列表中的一行
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct MultisendEntry {
    /// 收款钱包（含"system"哨兵行）
    pub wallet: String,
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

#[derive(Clone, Serialize, Debug, ToSchema)]
pub struct PayoutListResponse {
    pub total_people: usize,
    #[schema(value_type = f64)]
    pub total_ommv_to_send: Decimal,
    pub multisend_list: Vec<MultisendEntry>,
}

/// 一次结算中某推荐人被转入终身已付的金额
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct SettledEntry {
    pub referrer: String,
    #[schema(value_type = f64)]
    pub amount: Decimal,
}

#[derive(Clone, Serialize, Debug, ToSchema)]
pub struct MarkPaidResponse {
    pub message: String,
    pub summary: Vec<SettledEntry>,
}
