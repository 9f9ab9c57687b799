use anyhow::{Context, Result};
use backup::Backup;
use clap::Parser;
use ledger::{JsonFileStorage, LedgerStore};
use server::app::ApplicationServer;
use std::{path::PathBuf, sync::Arc};
use tokio::{signal, sync::Notify, task::JoinSet};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use utils::{AppConfig, Logger};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let ommv = Ommv::new();
    ommv.run().await.expect("OMMV backend error");

    Ok(())
}

pub struct Ommv {
    backup: Arc<Backup>,
    config: Arc<AppConfig>,
    _log_guard: WorkerGuard,
}

impl Ommv {
    pub fn new() -> Self {
        let config = Ommv::with_config();
        let log_guard = Logger::new(config.cargo_env);
        let backup = Ommv::with_backup(config.clone());

        Self {
            backup,
            config,
            _log_guard: log_guard,
        }
    }

    pub async fn run(self) -> Result<JoinSet<()>, Box<dyn std::error::Error>> {
        let shutdown_notify = Arc::new(Notify::new());
        let mut set = JoinSet::new();

        // 1. 启动每日备份任务
        // 2. 启动api server

        let backup = self.backup.clone();
        set.spawn(async move {
            backup.run().await;
        });

        let config = self.config.clone();
        set.spawn(async move {
            ApplicationServer::serve(config).await.context("🔴 Failed to start server").expect("🔴 Failed to start server");
        });

        tokio::select! {
            _ = async {
                while let Some(_) = set.join_next().await {
                    info!("🔔 Task completed");
                }
            } => {},
            _ = shutdown_signal() => {
                info!("🔔 Shutdown signal received, stopping all tasks...");
                shutdown_notify.notify_waiters();
            },
        }

        Ok(set)
    }
}

impl Ommv {
    fn with_config() -> Arc<AppConfig> {
        // 根据 CARGO_ENV 加载对应的环境配置文件
        utils::EnvLoader::load_env_file().ok();
        Arc::new(AppConfig::parse())
    }

    fn with_backup(config: Arc<AppConfig>) -> Arc<Backup> {
        // 备份任务只读，自持一份store不影响server侧的写临界区
        let storage = Arc::new(JsonFileStorage::new(&config.data_file));
        let store = Arc::new(LedgerStore::new(storage));

        Arc::new(Backup::new(None, store, PathBuf::from(&config.backup_dir)))
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("🔴 Failed to install Ctrl+C handler");
        info!("🔔 Ctrl+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate()).expect("🔴 Failed to install signal handler").recv().await;
        info!("🔔 Terminate signal received");
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("❌ Signal received, starting graceful shutdown...");
}
