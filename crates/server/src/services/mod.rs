////////////////////////////////////////////////////////////////////////
//
// 1. 每个Domain单独一个文件夹
// 2. Service定义业务规则trait，底层读写全部经由ledger::LedgerStore
//
//////////////////////////////////////////////////////////////////////

pub mod payout;
pub mod referral;

use ledger::DynLedgerStore;
use std::sync::Arc;
use utils::AppConfig;

use payout::payout_service::{DynPayoutService, PayoutService};
use referral::referral_service::{DynReferralService, ReferralService};

#[derive(Clone)]
pub struct Services {
    pub referral: DynReferralService,
    pub payout: DynPayoutService,
    pub store: DynLedgerStore,
    pub config: Arc<AppConfig>,
}

impl Services {
    pub fn new(store: DynLedgerStore, config: Arc<AppConfig>) -> Self {
        let referral = Arc::new(ReferralService::new(store.clone(), config.faucet_token.clone())) as DynReferralService;
        let payout = Arc::new(PayoutService::new(store.clone())) as DynPayoutService;

        Self {
            referral,
            payout,
            store,
            config,
        }
    }

    /// 内存后端的服务集（用于测试）
    pub fn new_for_test() -> Self {
        let storage = Arc::new(ledger::MemoryStorage::new());
        let store = Arc::new(ledger::LedgerStore::new(storage));
        let config = Arc::new(AppConfig::new_for_test());

        Self::new(store, config)
    }
}
