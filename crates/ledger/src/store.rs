use crate::{storage::DynLedgerStorage, Ledger};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use utils::AppResult;

/// 账本存取入口。
///
/// 所有写操作（register/redeem/credit_faucet/mark_paid）必须经由
/// `with_ledger`：一把互斥锁覆盖完整的 load → mutate → save 序列，
/// 并发写不会交错，经典的"两个redeem同时通过唯一性检查"竞态被排除。
/// 只读操作走 `read`，不取写锁，依赖文件后端的原子替换保证一致性。
pub struct LedgerStore {
    storage: DynLedgerStorage,
    write_lock: Mutex<()>,
}

pub type DynLedgerStore = Arc<LedgerStore>;

impl LedgerStore {
    pub fn new(storage: DynLedgerStorage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// 只读快照。`load`是纯读取，无持久化状态时返回空账本——
    /// 无锁的读者永远不会写文件，不可能覆盖持锁写者的提交。
    pub async fn read(&self) -> AppResult<Ledger> {
        self.storage.load().await
    }

    /// 首次运行的引导落盘：在写临界区内把当前状态（通常是空账本）
    /// 持久化一次。启动时调用，之后读者总能看到文件存在。
    pub async fn bootstrap(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let ledger = self.storage.load().await?;
        self.storage.save(&ledger).await?;
        info!("🧱 ledger bootstrapped ({} referral record(s))", ledger.referrals.len());

        Ok(())
    }

    /// 在排他临界区内执行一次完整的读-改-写。
    /// 闭包返回Err时直接放弃，不落盘——先校验后动作，
    /// 被拒绝的请求不会留下半份修改。
    pub async fn with_ledger<F, T>(&self, mutate: F) -> AppResult<T>
    where
        F: FnOnce(&mut Ledger) -> AppResult<T>,
    {
        let _guard = self.write_lock.lock().await;

        let mut ledger = self.storage.load().await?;
        let outcome = mutate(&mut ledger)?;
        self.storage.save(&ledger).await?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonFileStorage, MemoryStorage, ReferralRecord, REWARD_INCREMENT};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::path::PathBuf;
    use utils::AppError;

    fn new_store() -> Arc<LedgerStore> {
        Arc::new(LedgerStore::new(Arc::new(MemoryStorage::new())))
    }

    #[tokio::test]
    async fn test_failed_mutation_is_not_persisted() {
        let store = new_store();

        let result: AppResult<()> = store
            .with_ledger(|ledger| {
                ledger.referrals.push(ReferralRecord::placeholder("0xdead"));
                Err(AppError::BadRequest("rejected".into()))
            })
            .await;

        assert!(result.is_err());
        let ledger = store.read().await.unwrap();
        assert!(ledger.referrals.is_empty());
    }

    #[tokio::test]
    async fn test_sequential_mutations_accumulate() {
        let store = new_store();
        let referee = "0x1234567890abcdef1234567890abcdef12345678";

        store
            .with_ledger(|ledger| {
                ledger.referrals.push(ReferralRecord::redemption("0xaa", referee, Utc::now()));
                Ok(())
            })
            .await
            .unwrap();

        store
            .with_ledger(|ledger| {
                let record = ledger.find_referral_by_referee_mut(referee).unwrap();
                record.points = (record.points + *REWARD_INCREMENT).round_dp(2);
                Ok(())
            })
            .await
            .unwrap();

        let ledger = store.read().await.unwrap();
        assert_eq!(ledger.referrals[0].points, Decimal::new(2, 2));
    }

    #[tokio::test]
    async fn test_concurrent_mutations_lose_no_update() {
        let store = new_store();
        let referee = "0x1234567890abcdef1234567890abcdef12345678";

        store
            .with_ledger(|ledger| {
                ledger.referrals.push(ReferralRecord::redemption("0xaa", referee, Utc::now()));
                Ok(())
            })
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .with_ledger(|ledger| {
                        let record = ledger.find_referral_by_referee_mut(referee).unwrap();
                        record.points = (record.points + *REWARD_INCREMENT).round_dp(2);
                        Ok(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // 初始0.01 + 20次增量
        let ledger = store.read().await.unwrap();
        assert_eq!(ledger.referrals[0].points, Decimal::new(21, 2));
    }

    fn temp_store_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ledger_store_{}_{}.json", tag, std::process::id()))
    }

    #[tokio::test]
    async fn test_bootstrap_persists_empty_ledger_once() {
        let path = temp_store_path("bootstrap");
        let _ = tokio::fs::remove_file(&path).await;

        let store = LedgerStore::new(Arc::new(JsonFileStorage::new(&path)));
        store.bootstrap().await.unwrap();

        assert!(tokio::fs::try_exists(&path).await.unwrap());
        assert!(store.read().await.unwrap().referrals.is_empty());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_readers_on_fresh_file_never_clobber_committed_write() {
        let path = temp_store_path("fresh_readers");
        let _ = tokio::fs::remove_file(&path).await;

        let store = Arc::new(LedgerStore::new(Arc::new(JsonFileStorage::new(&path))));
        store.bootstrap().await.unwrap();

        // 一批无锁读者与持锁写者同时跑在刚引导的文件上
        let mut readers = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            readers.push(tokio::spawn(async move {
                for _ in 0..25 {
                    store.read().await.unwrap();
                }
            }));
        }

        store
            .with_ledger(|ledger| {
                ledger.referrals.push(ReferralRecord::redemption(
                    "0xaa",
                    "0x1234567890abcdef1234567890abcdef12345678",
                    Utc::now(),
                ));
                Ok(())
            })
            .await
            .unwrap();

        for reader in readers {
            reader.await.unwrap();
        }

        // 读路径不落盘，写者的提交不会被任何读者回滚
        let ledger = store.read().await.unwrap();
        assert_eq!(ledger.referrals.len(), 1);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
