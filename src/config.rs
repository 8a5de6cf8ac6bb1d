use std::io::ErrorKind;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 本地数据目录（结果存储落盘位置）
    pub data_dir: String,
    /// 每次测验的题目数量
    pub question_count: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.groq.com/openai/v1".to_string(),
            llm_model_name: "openai/gpt-oss-20b".to_string(),
            data_dir: "quiz_data".to_string(),
            question_count: 5,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 仅从环境变量加载（缺省值兜底）
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// 加载配置：可选 TOML 配置文件，环境变量优先
    ///
    /// 配置文件路径取 `CONFIG_FILE`，默认 `quiz_config.toml`；
    /// 文件不存在时直接用缺省值，解析失败时告警后用缺省值
    pub async fn load() -> Self {
        let path =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "quiz_config.toml".to_string());

        let base = match Self::from_file(&path).await {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("配置文件加载失败，使用缺省配置: {}", e);
                Self::default()
            }
        };

        base.overlay_env()
    }

    /// 从 TOML 文件读取配置，文件不存在时返回 None
    async fn from_file(path: &str) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("无法读取配置文件: {}", path)),
        };

        let config =
            toml::from_str(&content).with_context(|| format!("无法解析配置文件: {}", path))?;
        Ok(Some(config))
    }

    fn overlay_env(self) -> Self {
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            data_dir: std::env::var("QUIZ_DATA_DIR").unwrap_or(self.data_dir),
            question_count: std::env::var("QUESTION_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.question_count),
            verbose_logging: std::env::var("VERBOSE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
        }
    }
}
