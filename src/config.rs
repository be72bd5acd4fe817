//! 配置管理模块
//!
//! 提供TOML配置文件的读取、写入和自动发现功能，以及环境变量覆盖。

use crate::error::{Result, TranslationError};
use crate::types::{PipelineConfig, ProviderConfig, ServerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// 默认配置文件查找顺序
pub const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "page-translator.toml",
    "config.toml",
    ".page-translator.toml",
];

/// 翻译服务配置结构
///
/// 包含提供商、管线和 HTTP 服务三部分配置，支持从TOML文件加载和保存。
///
/// # 示例
///
/// ```rust,no_run
/// use page_translator::TranslatorConfig;
///
/// // 从默认位置加载配置
/// let mut config = TranslatorConfig::load_from_default_locations();
///
/// // 环境变量优先
/// config.apply_env_overrides();
///
/// // 保存配置到文件
/// config.save_to_file("output.toml").unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl TranslatorConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: TranslatorConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from multiple possible locations
    pub fn load_from_default_locations() -> Self {
        Self::load_first_of(DEFAULT_CONFIG_PATHS)
    }

    /// 按顺序尝试各路径，使用第一个能成功解析的文件，全部失败时使用默认值
    pub fn load_first_of<P: AsRef<Path>>(paths: &[P]) -> Self {
        paths
            .iter()
            .map(AsRef::<Path>::as_ref)
            .filter(|path| path.exists())
            .find_map(|path| match Self::from_file(path) {
                Ok(config) => {
                    info!("Loaded configuration from: {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_else(|| {
                info!("No configuration file found, using defaults");
                Self::default()
            })
    }

    /// Generate example configuration file
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }

    /// Apply `TRANSLATOR_*`, `HOST` and `PORT` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// 使用给定的查找函数覆盖配置项，空值忽略
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("TRANSLATOR_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = get("TRANSLATOR_API_URL") {
            self.provider.api_url = url;
        }
        if let Some(model) = get("TRANSLATOR_MODEL") {
            self.provider.model = model;
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }
    }

    /// 校验配置
    ///
    /// # 返回
    ///
    /// * `Ok(&str)` - 提供商凭证
    /// * `Err(TranslationError::Configuration)` - 缺少凭证或批次大小为 0
    pub fn validate(&self) -> Result<&str> {
        if self.pipeline.batch_size == 0 {
            return Err(TranslationError::Configuration(
                "pipeline.batch_size must be greater than zero".to_string(),
            ));
        }
        self.provider
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                TranslationError::Configuration("provider API key is not configured".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: TranslatorConfig = toml::from_str(
            r#"
            [provider]
            api_key = "sk-test"

            [pipeline]
            batch_size = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.provider.model, ProviderConfig::default().model);
        assert_eq!(config.pipeline.batch_size, 3);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page-translator.toml");

        let mut config = TranslatorConfig::default();
        config.provider.api_key = Some("sk-file".to_string());
        config.pipeline.default_target_language = Some("nl".to_string());
        config.save_to_file(&path).unwrap();

        let loaded = TranslatorConfig::from_file(&path).unwrap();
        assert_eq!(loaded.provider.api_key.as_deref(), Some("sk-file"));
        assert_eq!(loaded.pipeline.default_target_language.as_deref(), Some("nl"));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[provider\napi_key = ").unwrap();
        assert!(matches!(
            TranslatorConfig::from_file(&path),
            Err(TranslationError::Config(_))
        ));
    }

    #[test]
    fn first_loadable_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        let later = dir.path().join("later.toml");
        std::fs::write(&broken, "[pipeline\nbatch_size = ").unwrap();
        std::fs::write(&good, "[pipeline]\nbatch_size = 7\n").unwrap();
        std::fs::write(&later, "[pipeline]\nbatch_size = 9\n").unwrap();

        let config = TranslatorConfig::load_first_of(&[missing, broken, good, later]);
        assert_eq!(config.pipeline.batch_size, 7);

        let fallback = TranslatorConfig::load_first_of(&[dir.path().join("nothing.toml")]);
        assert_eq!(fallback.pipeline.batch_size, PipelineConfig::default().batch_size);
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("TRANSLATOR_API_KEY", "sk-env"),
            ("TRANSLATOR_MODEL", "env-model"),
            ("PORT", "8088"),
            ("HOST", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = TranslatorConfig::default();
        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.provider.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.provider.model, "env-model");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn missing_key_is_a_configuration_error() {
        let mut config = TranslatorConfig::default();
        assert!(matches!(config.validate(), Err(TranslationError::Configuration(_))));

        config.provider.api_key = Some("   ".to_string());
        assert!(matches!(config.validate(), Err(TranslationError::Configuration(_))));

        config.provider.api_key = Some("sk-ok".to_string());
        assert_eq!(config.validate().unwrap(), "sk-ok");

        config.pipeline.batch_size = 0;
        assert!(matches!(config.validate(), Err(TranslationError::Configuration(_))));
    }
}
