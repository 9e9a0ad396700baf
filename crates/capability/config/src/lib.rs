//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 数据目录：设置后启用文件快照持久化，未设置时为易失运行
    pub data_dir: Option<String>,
    /// 是否允许不选清单、逐点自由录入
    pub allow_adhoc_points: bool,
    /// 是否启用送审流程（关闭后所有提交直接入库）
    pub review_enabled: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_dir = read_optional("ROUNDS_DATA_DIR");
        let allow_adhoc_points = read_bool_with_default("ROUNDS_ALLOW_ADHOC_POINTS", false);
        let review_enabled = read_bool_with_default("ROUNDS_REVIEW", true);

        Ok(Self {
            data_dir,
            allow_adhoc_points,
            review_enabled,
        })
    }

    /// 先加载本地 .env（如存在），再从环境变量读取配置。
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }
}

impl Default for AppConfig {
    /// 默认配置：易失存储、禁止逐点自由录入、送审开启。
    fn default() -> Self {
        Self {
            data_dir: None,
            allow_adhoc_points: false,
            review_enabled: true,
        }
    }
}

fn read_optional(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_bool_with_default(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        Err(_) => default,
    }
}
