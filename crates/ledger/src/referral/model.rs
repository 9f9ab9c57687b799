use chrono::prelude::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::REWARD_INCREMENT;

/// 积分记录中表示"被推荐人自身奖励"的哨兵referrer，并非真实钱包
pub const SYSTEM_REFERRER: &str = "system";

/// 单个推荐人的有效推荐（referee非空）上限
pub const REFERRAL_CAP: usize = 200;

/// 推荐记录
///
/// referee为空字符串时表示"注册占位"记录：推荐人登记了推荐链接，
/// 但还没有推荐任何人。
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReferralRecord {
    /// 推荐人地址（或哨兵"system"）
    pub referrer: String,
    /// 被推荐人地址，注册占位记录为空串
    #[serde(default)]
    pub referee: String,
    /// 未结算积分，0.01粒度
    #[schema(value_type = f64)]
    pub points: Decimal,
    /// 最近一次计分时间
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl ReferralRecord {
    /// 注册占位记录
    pub fn placeholder(referrer: &str) -> Self {
        Self {
            referrer: referrer.to_string(),
            referee: String::new(),
            points: Decimal::ZERO,
            last_used: None,
        }
    }

    /// 兑换推荐时写入的计分记录，初始积分为固定增量
    pub fn redemption(referrer: &str, referee: &str, now: DateTime<Utc>) -> Self {
        Self {
            referrer: referrer.to_string(),
            referee: referee.to_string(),
            points: *REWARD_INCREMENT,
            last_used: Some(now),
        }
    }

    /// 是否为有效推荐记录（计入上限的那类）
    pub fn is_redemption(&self) -> bool {
        !self.referee.is_empty()
    }
}

/// 终身已支付记录，每个推荐人至多一条，total_paid单调不减
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaidRecord {
    pub referrer: String,
    #[schema(value_type = f64)]
    pub total_paid: Decimal,
    pub last_paid_at: DateTime<Utc>,
}

/// 某推荐人的聚合视图（派生数据，不落盘）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReferrerAggregate {
    #[schema(value_type = f64)]
    pub total_points: Decimal,
    #[schema(value_type = f64)]
    pub total_paid: Decimal,
    #[schema(value_type = f64)]
    pub total_unpaid: Decimal,
    pub referrals: Vec<ReferralRecord>,
}

/// 整个账本文档。所有变更都是全量读-改-写，记录只清零不删除。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    pub referrals: Vec<ReferralRecord>,
    pub paid_referrals: Vec<PaidRecord>,
}

impl Ledger {
    /// 按插入顺序返回第一条referee匹配的记录。
    ///
    /// 同一referee同时存在真人推荐记录与system计分记录，真人记录先插入，
    /// 因此"第一条命中"即真人推荐记录——调用方依赖这一顺序语义，不可改为
    /// 按记录类型筛选。
    pub fn find_referral_by_referee(&self, referee: &str) -> Option<&ReferralRecord> {
        self.referrals.iter().find(|r| r.referee == referee)
    }

    pub fn find_referral_by_referee_mut(&mut self, referee: &str) -> Option<&mut ReferralRecord> {
        self.referrals.iter_mut().find(|r| r.referee == referee)
    }

    /// 该地址是否已作为referrer出现过（含注册占位记录）
    pub fn has_referrer(&self, address: &str) -> bool {
        self.referrals.iter().any(|r| r.referrer == address)
    }

    /// 有效推荐数：referrer匹配且referee非空
    pub fn redemption_count(&self, referrer: &str) -> usize {
        self.referrals.iter().filter(|r| r.referrer == referrer && r.is_redemption()).count()
    }

    /// 聚合某推荐人的积分与支付情况，金额按2位小数取整
    pub fn aggregate_for_referrer(&self, referrer: &str) -> ReferrerAggregate {
        let referrals: Vec<ReferralRecord> = self.referrals.iter().filter(|r| r.referrer == referrer).cloned().collect();

        let total_points: Decimal = referrals.iter().map(|r| r.points).sum::<Decimal>().round_dp(2);
        let total_paid: Decimal = self
            .paid_referrals
            .iter()
            .filter(|p| p.referrer == referrer)
            .map(|p| p.total_paid)
            .sum::<Decimal>()
            .round_dp(2);
        let total_unpaid = (total_points - total_paid).round_dp(2);

        ReferrerAggregate {
            total_points,
            total_paid,
            total_unpaid,
            referrals,
        }
    }

    pub fn find_paid_by_referrer_mut(&mut self, referrer: &str) -> Option<&mut PaidRecord> {
        self.paid_referrals.iter_mut().find(|p| p.referrer == referrer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(i: u32) -> String {
        format!("0x{:040x}", i)
    }

    fn ledger_with_redemption(referrer: &str, referee: &str) -> Ledger {
        let now = Utc::now();
        let mut ledger = Ledger::default();
        ledger.referrals.push(ReferralRecord::redemption(referrer, referee, now));
        ledger.referrals.push(ReferralRecord::redemption(SYSTEM_REFERRER, referee, now));
        ledger
    }

    #[test]
    fn test_find_by_referee_first_match_wins() {
        let referrer = addr(1);
        let referee = addr(2);
        let ledger = ledger_with_redemption(&referrer, &referee);

        // 真人推荐记录先插入，必须先命中它而不是system记录
        let hit = ledger.find_referral_by_referee(&referee).unwrap();
        assert_eq!(hit.referrer, referrer);
    }

    #[test]
    fn test_placeholder_is_not_a_redemption() {
        let referrer = addr(1);
        let mut ledger = Ledger::default();
        ledger.referrals.push(ReferralRecord::placeholder(&referrer));

        assert!(ledger.has_referrer(&referrer));
        assert_eq!(ledger.redemption_count(&referrer), 0);
        assert!(ledger.find_referral_by_referee("").is_some());
    }

    #[test]
    fn test_redemption_count_ignores_system_records() {
        let referrer = addr(1);
        let referee = addr(2);
        let ledger = ledger_with_redemption(&referrer, &referee);

        assert_eq!(ledger.redemption_count(&referrer), 1);
        assert_eq!(ledger.redemption_count(SYSTEM_REFERRER), 1);
    }

    #[test]
    fn test_aggregate_rounds_to_two_decimals() {
        let referrer = addr(1);
        let mut ledger = ledger_with_redemption(&referrer, &addr(2));
        ledger.referrals.push(ReferralRecord::redemption(&referrer, &addr(3), Utc::now()));
        ledger.paid_referrals.push(PaidRecord {
            referrer: referrer.clone(),
            total_paid: Decimal::new(1, 2),
            last_paid_at: Utc::now(),
        });

        let agg = ledger.aggregate_for_referrer(&referrer);
        assert_eq!(agg.total_points, Decimal::new(2, 2));
        assert_eq!(agg.total_paid, Decimal::new(1, 2));
        assert_eq!(agg.total_unpaid, Decimal::new(1, 2));
        assert_eq!(agg.referrals.len(), 2);
    }

    #[test]
    fn test_aggregate_for_unknown_referrer_is_zero() {
        let ledger = Ledger::default();
        let agg = ledger.aggregate_for_referrer(&addr(9));
        assert_eq!(agg.total_points, Decimal::ZERO);
        assert_eq!(agg.total_unpaid, Decimal::ZERO);
        assert!(agg.referrals.is_empty());
    }

    #[test]
    fn test_ledger_serde_round_trip() {
        let ledger = ledger_with_redemption(&addr(1), &addr(2));
        let json = serde_json::to_string_pretty(&ledger).unwrap();
        let reloaded: Ledger = serde_json::from_str(&json).unwrap();

        assert_eq!(reloaded.referrals.len(), 2);
        assert_eq!(reloaded.referrals[0].referrer, addr(1));
        assert_eq!(reloaded.referrals[0].points, *REWARD_INCREMENT);
    }

    #[test]
    fn test_empty_referee_deserializes_by_default() {
        // 旧数据中注册占位记录可能缺失referee字段
        let json = r#"{"referrals":[{"referrer":"0xaa","points":0.0}],"paid_referrals":[]}"#;
        let ledger: Ledger = serde_json::from_str(json).unwrap();
        assert_eq!(ledger.referrals[0].referee, "");
        assert!(ledger.referrals[0].last_used.is_none());
    }
}
