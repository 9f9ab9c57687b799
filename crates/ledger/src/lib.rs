////////////////////////////////////////////////////////////////////////
//
// 推荐账本数据层
// 1. referral: 账本Schema与纯查询原语
// 2. storage: load/save为唯一I/O边界（文件后端原子替换，内存后端用于测试）
// 3. store: 串行化"读取-修改-保存"的临界区
//
//////////////////////////////////////////////////////////////////////

pub mod referral;
pub mod storage;
pub mod store;

pub use referral::model::{Ledger, PaidRecord, ReferralRecord, ReferrerAggregate, REFERRAL_CAP, SYSTEM_REFERRER};
pub use referral::REWARD_INCREMENT;
pub use storage::{DynLedgerStorage, JsonFileStorage, LedgerStorage, MemoryStorage};
pub use store::{DynLedgerStore, LedgerStore};
