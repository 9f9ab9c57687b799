use crate::{storage::LedgerStorage, Ledger};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use utils::AppResult;

// 每次save使用独立的临时文件名：落后的写者不可能在别人rename之后
// 再把自己的旧内容发布到同一个目标路径
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// JSON文件后端。写入走"同目录唯一临时文件 + rename"，
/// 读者要么看到旧文件要么看到新文件，不会看到半写内容。
///
/// `load`是纯读取：文件不存在时直接返回空账本，不落盘。
/// 首次落盘只发生在写路径上（store的写临界区内），无锁的读者
/// 不会因为引导写入而与持锁的写者竞争同一目标文件。
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_tmp_path(&self) -> PathBuf {
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_else(|| "ledger.json".into());
        name.push(format!(".{}.{}.tmp", std::process::id(), seq));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LedgerStorage for JsonFileStorage {
    async fn load(&self) -> AppResult<Ledger> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Ledger::default());
        }

        let bytes = fs::read(&self.path).await?;
        let ledger = serde_json::from_slice(&bytes)?;

        Ok(ledger)
    }

    async fn save(&self, ledger: &Ledger) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let bytes = serde_json::to_vec_pretty(ledger)?;
        let tmp = self.next_tmp_path();

        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}
