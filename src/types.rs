//! 类型定义模块
//!
//! 定义配置类型以及与提供商交互的请求/响应数据结构。

use crate::batch::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};

/// 提供商配置
///
/// # 字段说明
///
/// * `api_url` - OpenAI 兼容的 chat completions 接口地址
/// * `api_key` - 提供商凭证，可由环境变量 `TRANSLATOR_API_KEY` 覆盖
/// * `model` - 默认模型标识，请求中未指定模型时使用
/// * `timeout_secs` - 单次请求超时，0 表示不设置
/// * `max_requests_per_second` - 相邻两次调用的最大频率，0 表示不限制
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_requests_per_second: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:11434/v1/chat/completions".to_string(),
            api_key: None,
            model: "google/gemini-2.5-flash".to_string(),
            timeout_secs: 120,
            max_requests_per_second: 0.0,
        }
    }
}

/// 管线配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// 每批区块数
    pub batch_size: usize,
    /// 请求未指定目标语言时使用，为空则必须由请求指定
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_target_language: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            default_target_language: None,
        }
    }
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// `choices[0].message.content`
    pub fn into_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}
