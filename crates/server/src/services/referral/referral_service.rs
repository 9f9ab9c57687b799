use async_trait::async_trait;
use chrono::Utc;
use ledger::{DynLedgerStore, ReferralRecord, ReferrerAggregate, REFERRAL_CAP, REWARD_INCREMENT, SYSTEM_REFERRER};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use utils::{is_valid_address, AppError, AppResult};

pub type DynReferralService = Arc<dyn ReferralServiceTrait + Send + Sync>;

/// 一次推荐兑换的计分结果，两侧均为固定增量
#[derive(Debug, Clone, Copy)]
pub struct RedeemOutcome {
    pub referrer_earned: Decimal,
    pub referee_earned: Decimal,
}

/// 领水计分结果
#[derive(Debug, Clone)]
pub enum FaucetOutcome {
    /// 被推荐钱包领水，其推荐人记录计入一次增量
    Credited {
        referrer: String,
        points_earned: Decimal,
        total_points: Decimal,
    },
    /// 未被推荐的钱包领水：合法但不产生积分
    NotReferred,
}

#[async_trait]
pub trait ReferralServiceTrait {
    /// 登记推荐链接（幂等）
    async fn register(&self, address: &str) -> AppResult<()>;

    /// 兑换推荐：写入真人记录与system记录各0.01
    async fn redeem(&self, referrer: &str, referee: &str, faucet_token: &str) -> AppResult<RedeemOutcome>;

    /// 领水计分：被推荐钱包领水时给首条匹配记录加0.01
    async fn credit_faucet(&self, referee: &str, faucet_token: &str) -> AppResult<FaucetOutcome>;

    /// 某推荐人的积分聚合
    async fn status(&self, address: &str) -> AppResult<ReferrerAggregate>;
}

#[derive(Clone)]
pub struct ReferralService {
    store: DynLedgerStore,
    faucet_token: String,
}

impl ReferralService {
    pub fn new(store: DynLedgerStore, faucet_token: String) -> Self {
        Self { store, faucet_token }
    }

    /// 归一化为小写再校验，所有入库地址均为小写
    fn normalize_address(address: &str) -> AppResult<String> {
        let address = address.to_lowercase();
        if !is_valid_address(&address) {
            return Err(AppError::InvalidAddress(address));
        }
        Ok(address)
    }

    fn check_token(&self, faucet_token: &str) -> AppResult<()> {
        if faucet_token != self.faucet_token {
            return Err(AppError::InvalidToken);
        }
        Ok(())
    }
}

#[async_trait]
impl ReferralServiceTrait for ReferralService {
    async fn register(&self, address: &str) -> AppResult<()> {
        let address = Self::normalize_address(address)?;

        self.store
            .with_ledger(|ledger| {
                if !ledger.has_referrer(&address) {
                    ledger.referrals.push(ReferralRecord::placeholder(&address));
                    info!("🔗 referral link registered: {}", address);
                }
                Ok(())
            })
            .await
    }

    async fn redeem(&self, referrer: &str, referee: &str, faucet_token: &str) -> AppResult<RedeemOutcome> {
        // 先校验后动作：任何拒绝都发生在写入之前
        let referrer = Self::normalize_address(referrer)?;
        let referee = Self::normalize_address(referee)?;
        self.check_token(faucet_token)?;

        self.store
            .with_ledger(|ledger| {
                // 每个钱包终身只能被推荐一次
                if ledger.find_referral_by_referee(&referee).is_some() {
                    return Err(AppError::AlreadyReferred(referee.clone()));
                }

                if ledger.redemption_count(&referrer) >= REFERRAL_CAP {
                    return Err(AppError::ReferralCapExceeded(referrer.clone()));
                }

                // 真人记录必须先于system记录插入，find_referral_by_referee
                // 的"第一条命中"才会返回真人推荐记录
                let now = Utc::now();
                ledger.referrals.push(ReferralRecord::redemption(&referrer, &referee, now));
                ledger.referrals.push(ReferralRecord::redemption(SYSTEM_REFERRER, &referee, now));

                info!("🤝 referral redeemed: {} -> {}", referrer, referee);

                Ok(RedeemOutcome {
                    referrer_earned: *REWARD_INCREMENT,
                    referee_earned: *REWARD_INCREMENT,
                })
            })
            .await
    }

    async fn credit_faucet(&self, referee: &str, faucet_token: &str) -> AppResult<FaucetOutcome> {
        let referee = Self::normalize_address(referee)?;
        self.check_token(faucet_token)?;

        // 未被推荐的钱包不进入写临界区，账本保持原样
        let snapshot = self.store.read().await?;
        if snapshot.find_referral_by_referee(&referee).is_none() {
            return Ok(FaucetOutcome::NotReferred);
        }

        self.store
            .with_ledger(|ledger| {
                let record = match ledger.find_referral_by_referee_mut(&referee) {
                    Some(record) => record,
                    // 记录只增不删，快照命中后这里不应落空
                    None => return Ok(FaucetOutcome::NotReferred),
                };

                record.points = (record.points + *REWARD_INCREMENT).round_dp(2);
                record.last_used = Some(Utc::now());

                info!("🚰 faucet credit: {} -> {} ({})", referee, record.referrer, record.points);

                Ok(FaucetOutcome::Credited {
                    referrer: record.referrer.clone(),
                    points_earned: *REWARD_INCREMENT,
                    total_points: record.points,
                })
            })
            .await
    }

    async fn status(&self, address: &str) -> AppResult<ReferrerAggregate> {
        let address = address.to_lowercase();
        let ledger = self.store.read().await?;

        Ok(ledger.aggregate_for_referrer(&address))
    }
}
