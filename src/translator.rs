//! 翻译服务核心模块
//!
//! 提供批次翻译与单区块翻译。批次路径在提取失败时回退为原文，
//! 单区块路径直接把错误交给调用方。

use crate::batch::Batch;
use crate::config::TranslatorConfig;
use crate::error::{Result, TranslationError};
use crate::extract::{extract_batch, extract_section};
use crate::prompt::TranslationRequest;
use crate::provider::{ChatProvider, HttpChatProvider};
use crate::section::{merge_batch, Section};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 翻译服务主类
///
/// 持有提供商客户端与管线参数。凭证在构造时注入，构造成功即说明配置完整。
///
/// # 示例
///
/// ```rust,no_run
/// use page_translator::{TranslationService, TranslatorConfig};
///
/// let mut config = TranslatorConfig::default();
/// config.provider.api_key = Some("sk-...".to_string());
///
/// let service = TranslationService::new(&config).expect("configured");
/// assert_eq!(service.batch_size(), 5);
/// ```
#[derive(Clone)]
pub struct TranslationService {
    provider: Arc<dyn ChatProvider>,
    default_model: String,
    default_target_language: Option<String>,
    batch_size: usize,
}

impl TranslationService {
    /// 使用 HTTP 提供商创建服务
    ///
    /// # 返回
    ///
    /// * `Err(TranslationError::Configuration)` - 缺少凭证或批次大小为 0
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let api_key = config.validate()?;
        let provider = HttpChatProvider::new(&config.provider, api_key)?;
        Self::with_provider(Arc::new(provider), config)
    }

    /// 使用任意提供商创建服务，不要求配置中包含凭证
    pub fn with_provider(provider: Arc<dyn ChatProvider>, config: &TranslatorConfig) -> Result<Self> {
        if config.pipeline.batch_size == 0 {
            return Err(TranslationError::Configuration(
                "pipeline.batch_size must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            provider,
            default_model: config.provider.model.clone(),
            default_target_language: config.pipeline.default_target_language.clone(),
            batch_size: config.pipeline.batch_size,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Resolve the model for a request, falling back to the configured default.
    pub fn resolve_model<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(self.default_model.as_str())
    }

    /// 解析目标语言
    ///
    /// 请求未指定且没有配置默认值时返回 `Validation` 错误。
    pub fn resolve_target_language<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str> {
        requested
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .or(self.default_target_language.as_deref())
            .ok_or_else(|| TranslationError::Validation("Target language is required".to_string()))
    }

    /// 翻译一个批次
    ///
    /// # 返回
    ///
    /// * `Ok(Vec<Section>)` - 与输入数量、顺序一致的区块；提取失败时为原文
    /// * `Err(TranslationError)` - 提供商调用失败，整次运行应终止
    pub async fn translate_batch(
        &self,
        batch: &Batch,
        target_language: &str,
        model: &str,
    ) -> Result<Vec<Section>> {
        let messages = TranslationRequest::batch(target_language, model, &batch.sections).messages()?;
        debug!("批次 {} 包含 {} 个区块", batch.number, batch.len());

        let reply = self.provider.complete(model, &messages).await?;

        match extract_batch(&reply) {
            Ok(translated) => {
                if translated.len() != batch.len() {
                    warn!(
                        "批次 {} 返回 {} 个区块，期望 {} 个",
                        batch.number,
                        translated.len(),
                        batch.len()
                    );
                }
                Ok(merge_batch(&batch.sections, &translated))
            }
            Err(e) if !e.is_fatal() => {
                warn!("批次 {} 解析失败，使用原文: {}", batch.number, e);
                Ok(batch.sections.clone())
            }
            Err(e) => Err(e),
        }
    }

    /// 翻译单个区块
    ///
    /// 不做原文回退，提取失败直接返回 `ExtractionFailed`。
    pub async fn translate_section(
        &self,
        section: &Section,
        target_language: Option<&str>,
        model: Option<&str>,
    ) -> Result<Section> {
        let target_language = self.resolve_target_language(target_language)?;
        let model = self.resolve_model(model);
        info!(
            "翻译单个区块 {} ({:?}) -> {}",
            section.id().unwrap_or(&serde_json::Value::Null),
            section.kind(),
            target_language
        );

        let messages = TranslationRequest::section(target_language, model, section).messages()?;
        let reply = self.provider.complete(model, &messages).await?;
        let translated = extract_section(&reply)?;

        Ok(section.merge_translation(&translated))
    }
}
