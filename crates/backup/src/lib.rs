// Backup: 每日00:00定时执行
// - 取一份账本只读快照，写入带时间戳的备份文件；从不自动清理旧备份
use chrono::Utc;
use cron::Schedule;
use ledger::DynLedgerStore;
use std::{path::PathBuf, str::FromStr, sync::Arc, time::Duration};
use tokio::time::sleep_until;
use tracing::{error, info};
use utils::AppResult;

pub struct Backup {
    pub time: String,
    pub store: DynLedgerStore,
    pub backup_dir: PathBuf,
}

impl Backup {
    // "0 0 0 * * *": 每天00:00:00执行
    pub fn new(time: Option<String>, store: DynLedgerStore, backup_dir: PathBuf) -> Self {
        Self {
            time: time.unwrap_or_else(|| "0 0 0 * * *".to_string()),
            store,
            backup_dir,
        }
    }

    pub async fn run(self: Arc<Self>) {
        info!("⏳ ledger backup scheduled at {} everyday.", self.time);

        let schedule = Schedule::from_str(&self.time).expect("invalid backup cron expression");

        loop {
            let now = Utc::now();
            let next_run_time = schedule.upcoming(Utc).next().expect("cron schedule has no upcoming run");

            let duration_until_next_run = (next_run_time - now).to_std().unwrap_or(Duration::from_secs(0));

            sleep_until(tokio::time::Instant::now() + duration_until_next_run).await;

            // 备份失败只记录日志，不影响对外服务
            match self.snapshot().await {
                Ok(path) => info!("💾 backup written: {:?}", path),
                Err(e) => error!("🔴 backup failed: {}", e),
            }
        }
    }

    /// 全量快照。只经由store的只读接口，不持有写锁。
    pub async fn snapshot(&self) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.backup_dir).await?;

        let ledger = self.store.read().await?;

        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let backup_path = self.backup_dir.join(format!("referrals_backup_{}.json", timestamp));

        let bytes = serde_json::to_vec_pretty(&ledger)?;
        tokio::fs::write(&backup_path, bytes).await?;

        Ok(backup_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger::{Ledger, LedgerStore, MemoryStorage, ReferralRecord};

    fn temp_backup_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("backup_{}_{}", tag, std::process::id()))
    }

    #[tokio::test]
    async fn test_snapshot_writes_full_ledger_copy() {
        let store: DynLedgerStore = Arc::new(LedgerStore::new(Arc::new(MemoryStorage::new())));
        store
            .with_ledger(|ledger| {
                ledger.referrals.push(ReferralRecord::placeholder("0x1234567890abcdef1234567890abcdef12345678"));
                Ok(())
            })
            .await
            .unwrap();

        let dir = temp_backup_dir("snapshot");
        let backup = Backup::new(None, store, dir.clone());

        let path = backup.snapshot().await.unwrap();
        assert!(path.starts_with(&dir));

        let bytes = tokio::fs::read(&path).await.unwrap();
        let copy: Ledger = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(copy.referrals.len(), 1);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[test]
    fn test_default_schedule_is_daily_midnight() {
        let schedule = Schedule::from_str("0 0 0 * * *").unwrap();
        let next = schedule.upcoming(Utc).next().unwrap();
        assert_eq!(next.format("%H:%M:%S").to_string(), "00:00:00");
    }
}
