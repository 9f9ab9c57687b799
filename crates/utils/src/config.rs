#[derive(clap::ValueEnum, Clone, Debug, Copy)]
#[clap(rename_all = "lowercase")]
pub enum CargoEnv {
    Development,
    Production,
}

/// 环境配置加载器
pub struct EnvLoader;

impl EnvLoader {
    /// 根据 CARGO_ENV 加载对应的环境配置文件
    pub fn load_env_file() -> Result<(), Box<dyn std::error::Error>> {
        let cargo_env = std::env::var("CARGO_ENV").unwrap_or_else(|_| "development".to_string());

        let env_file = match cargo_env.as_str() {
            "production" | "Production" | "prod" => ".env.production",
            "development" | "Development" | "dev" => ".env.development",
            "test" | "Test" => ".env.test",
            _ => {
                println!("⚠️  未知的 CARGO_ENV: {}，使用默认的 .env.development", cargo_env);
                ".env.development"
            }
        };

        // 指定文件不存在时回退到默认的 .env
        if !std::path::Path::new(env_file).exists() {
            if std::path::Path::new(".env").exists() {
                dotenvy::from_filename(".env")?;
                println!("✅ 已加载默认配置文件: .env");
            }
            return Ok(());
        }

        dotenvy::from_filename(env_file)?;
        println!("✅ 已加载环境配置文件: {} (CARGO_ENV={})", env_file, cargo_env);

        Ok(())
    }
}

#[derive(clap::Parser, Clone)]
pub struct AppConfig {
    #[clap(long, env, value_enum)]
    pub cargo_env: CargoEnv,

    #[clap(long, env, default_value = "0.0.0.0")]
    pub app_host: String,

    #[clap(long, env, default_value = "5000")]
    pub app_port: u16,

    /// 账本文件路径（整个文件即数据库，原子替换写入）
    #[clap(long, env, default_value = "referrals.json")]
    pub data_file: String,

    /// 每日备份目录
    #[clap(long, env, default_value = "backups")]
    pub backup_dir: String,

    /// mark-paid 管理接口的共享密钥（X-Secret-Key 请求头）
    #[clap(long, env)]
    pub secret_key: String,

    /// 领水凭证，由水龙头前端在调用时携带
    #[clap(long, env, default_value = "VALID_FAUCET_USAGE")]
    pub faucet_token: String,

    #[clap(long, env, default_value = "info")]
    pub rust_log: String,
}

impl AppConfig {
    /// 手动创建配置实例（用于测试）
    pub fn new_for_test() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            app_host: "0.0.0.0".to_string(),
            app_port: 5001,
            data_file: "referrals_test.json".to_string(),
            backup_dir: "backups_test".to_string(),
            secret_key: "test-secret-key".to_string(),
            faucet_token: "VALID_FAUCET_USAGE".to_string(),
            rust_log: "info".to_string(),
        }
    }
}
