//! 错误处理模块
//!
//! 定义翻译管线中使用的错误类型，以及错误到调用方消息、HTTP状态码的映射。

use thiserror::Error;

/// 翻译错误类型
///
/// 包含翻译管线中可能出现的各种错误情况。
///
/// # 变体说明
///
/// * `Configuration` - 缺少必需的配置（例如提供商凭证）
/// * `Validation` - 输入为空或缺少必填字段，不会发起任何网络请求
/// * `RateLimited` - 提供商返回 429
/// * `PaymentRequired` - 提供商返回 402
/// * `Provider` - 提供商返回其他非 2xx 状态，或响应结构不可用
/// * `Http` - 传输层错误
/// * `ExtractionFailed` - 提供商回复无法解析为 JSON
/// * `Config` - 配置文件读取或解析失败
#[derive(Debug, Error)]
pub enum TranslationError {
    /// 缺少必需的配置
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// 输入校验失败
    #[error("{0}")]
    Validation(String),
    /// 速率限制
    #[error("Rate limit exceeded, please try again later.")]
    RateLimited,
    /// 需要付费
    #[error("Payment required, please add credits to your workspace.")]
    PaymentRequired,
    /// 提供商错误
    #[error("Provider error (status {status:?}): {message}")]
    Provider {
        /// HTTP 状态码，响应结构错误时为 None
        status: Option<u16>,
        /// 诊断信息，仅记录在服务端日志
        message: String,
    },
    /// HTTP请求错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// 提取失败，附带原始回复
    #[error("Failed to extract JSON from provider reply: {message}")]
    ExtractionFailed {
        /// 解析错误
        message: String,
        /// 提供商原始回复
        raw: String,
    },
    /// 配置文件错误
    #[error("Config file error: {0}")]
    Config(String),
}

impl TranslationError {
    /// Whether this error aborts a whole page run.
    ///
    /// Only extraction failures are recoverable, and only at batch granularity.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TranslationError::ExtractionFailed { .. })
    }

    /// The message that may be shown to the caller.
    ///
    /// Provider and transport diagnostics stay in the server log.
    pub fn client_message(&self) -> String {
        match self {
            TranslationError::Provider { .. } | TranslationError::Http(_) => {
                "Translation failed".to_string()
            }
            TranslationError::ExtractionFailed { .. } => {
                "Failed to parse translation response".to_string()
            }
            other => other.to_string(),
        }
    }

    /// HTTP status used when this error is returned from a request handler.
    pub fn status_code(&self) -> u16 {
        match self {
            TranslationError::Validation(_) => 400,
            TranslationError::PaymentRequired => 402,
            TranslationError::RateLimited => 429,
            _ => 500,
        }
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::Config(error.to_string())
    }
}

impl From<toml::ser::Error> for TranslationError {
    fn from(error: toml::ser::Error) -> Self {
        TranslationError::Config(error.to_string())
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::Config(error.to_string())
    }
}

/// 翻译结果类型别名
///
/// 简化返回类型，使用 `TranslationError` 作为错误类型。
///
/// # 示例
///
/// ```rust
/// use page_translator::{Result, TranslationError};
///
/// fn example_function() -> Result<String> {
///     Err(TranslationError::Validation("No sections provided".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TranslationError>;
