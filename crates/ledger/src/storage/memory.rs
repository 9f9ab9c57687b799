use crate::{storage::LedgerStorage, Ledger};
use async_trait::async_trait;
use tokio::sync::RwLock;
use utils::AppResult;

/// 内存后端，语义与文件后端一致，供测试替换使用
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<Option<Ledger>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStorage for MemoryStorage {
    async fn load(&self) -> AppResult<Ledger> {
        // 与文件后端一致：load是纯读取，未初始化时返回空账本
        let guard = self.inner.read().await;
        Ok(guard.clone().unwrap_or_default())
    }

    async fn save(&self, ledger: &Ledger) -> AppResult<()> {
        let mut guard = self.inner.write().await;
        *guard = Some(ledger.clone());
        Ok(())
    }
}
