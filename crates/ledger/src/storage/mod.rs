pub mod file;
pub mod memory;

use crate::Ledger;
use async_trait::async_trait;
use std::sync::Arc;
use utils::AppResult;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;

pub type DynLedgerStorage = Arc<dyn LedgerStorage + Send + Sync>;

/// 账本持久化的唯一I/O边界
#[async_trait]
pub trait LedgerStorage {
    /// 读取当前账本；无持久化状态时返回空账本，不产生写入。
    /// 首次落盘由store在写临界区内完成（见`LedgerStore::bootstrap`）。
    async fn load(&self) -> AppResult<Ledger>;

    /// 原子替换持久化状态，失败时不得出现半写状态
    async fn save(&self, ledger: &Ledger) -> AppResult<()>;
}
