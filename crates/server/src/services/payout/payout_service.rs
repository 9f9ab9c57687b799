use crate::dtos::payout_dto::{MultisendEntry, PayoutListResponse, SettledEntry};
use async_trait::async_trait;
use chrono::Utc;
use ledger::{DynLedgerStore, PaidRecord};
use rust_decimal::Decimal;
use std::{collections::HashMap, sync::Arc};
use tracing::info;
use utils::AppResult;

pub type DynPayoutService = Arc<dyn PayoutServiceTrait + Send + Sync>;

#[async_trait]
pub trait PayoutServiceTrait {
    /// 当前未支付余额的批量转账列表（只读）
    async fn payout_list(&self) -> AppResult<PayoutListResponse>;

    /// 结算：清零所有正积分并累入终身已付，单个读-改-写单元
    async fn mark_paid(&self) -> AppResult<Vec<SettledEntry>>;
}

#[derive(Clone)]
pub struct PayoutService {
    store: DynLedgerStore,
}

impl PayoutService {
    pub fn new(store: DynLedgerStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PayoutServiceTrait for PayoutService {
    async fn payout_list(&self) -> AppResult<PayoutListResponse> {
        let ledger = self.store.read().await?;

        let multisend_list: Vec<MultisendEntry> = ledger
            .referrals
            .iter()
            .filter(|r| r.points > Decimal::ZERO)
            .map(|r| MultisendEntry {
                wallet: r.referrer.clone(),
                amount: r.points,
            })
            .collect();

        let total_ommv_to_send: Decimal = multisend_list.iter().map(|e| e.amount).sum::<Decimal>().round_dp(2);

        Ok(PayoutListResponse {
            total_people: multisend_list.len(),
            total_ommv_to_send,
            multisend_list,
        })
    }

    async fn mark_paid(&self) -> AppResult<Vec<SettledEntry>> {
        let summary = self
            .store
            .with_ledger(|ledger| {
                let now = Utc::now();

                // 清零的同时按首次出现顺序累计每个推荐人的结算额
                let mut order: Vec<String> = Vec::new();
                let mut settled: HashMap<String, Decimal> = HashMap::new();

                for record in ledger.referrals.iter_mut() {
                    if record.points > Decimal::ZERO {
                        let entry = settled.entry(record.referrer.clone()).or_insert_with(|| {
                            order.push(record.referrer.clone());
                            Decimal::ZERO
                        });
                        *entry = (*entry + record.points).round_dp(2);
                        record.points = Decimal::ZERO;
                    }
                }

                // 累入终身已付，total_paid只增不减
                for referrer in &order {
                    let amount = settled[referrer];
                    match ledger.find_paid_by_referrer_mut(referrer) {
                        Some(paid) => {
                            paid.total_paid = (paid.total_paid + amount).round_dp(2);
                            paid.last_paid_at = now;
                        }
                        None => ledger.paid_referrals.push(PaidRecord {
                            referrer: referrer.clone(),
                            total_paid: amount,
                            last_paid_at: now,
                        }),
                    }
                }

                Ok(order
                    .iter()
                    .map(|referrer| SettledEntry {
                        referrer: referrer.clone(),
                        amount: settled[referrer],
                    })
                    .collect::<Vec<_>>())
            })
            .await?;

        info!("💸 mark-paid settled {} referrer(s)", summary.len());

        Ok(summary)
    }
}
