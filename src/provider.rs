//! 提供商客户端模块
//!
//! 定义文本生成提供商的调用接口，以及基于 reqwest 的 OpenAI 兼容实现。
//! 每次调用只尝试一次，不做自动重试。

use crate::error::{Result, TranslationError};
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ProviderConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, error};

/// 文本生成提供商
///
/// 返回 `choices[0].message.content`。
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String>;
}

/// 速率限制器
///
/// 保证相邻两次提供商调用之间至少间隔 `1 / requests_per_second` 秒。
/// 只负责节流，不重试。
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// 创建新的速率限制器
    ///
    /// # 参数
    ///
    /// * `requests_per_second` - 每秒允许的最大请求数，小于等于 0 表示不限制
    ///
    /// # 示例
    ///
    /// ```rust
    /// use page_translator::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0); // 两次请求间隔至少 500ms
    /// ```
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = if requests_per_second > 0.0 {
            Duration::from_secs_f64(1.0 / requests_per_second)
        } else {
            Duration::ZERO
        };

        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// 获取请求许可
    ///
    /// 在发起API请求前调用，必要时等待到最小间隔结束。
    pub async fn acquire(&self) {
        let mut last_call = self.last_call.lock().await;
        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *last_call = Some(Instant::now());
    }
}

/// OpenAI 兼容的 chat completions 客户端
pub struct HttpChatProvider {
    /// HTTP客户端，用于API调用
    client: Client,
    api_url: String,
    api_key: String,
    rate_limiter: RateLimiter,
}

impl HttpChatProvider {
    /// 创建客户端
    ///
    /// # 参数
    ///
    /// * `config` - 提供商配置
    /// * `api_key` - 已校验的凭证
    pub fn new(config: &ProviderConfig, api_key: impl Into<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(concat!("page-translator/", env!("CARGO_PKG_VERSION")));
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        Ok(Self {
            client: builder.build()?,
            api_url: config.api_url.clone(),
            api_key: api_key.into(),
            rate_limiter: RateLimiter::new(config.max_requests_per_second),
        })
    }
}

#[async_trait]
impl ChatProvider for HttpChatProvider {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<String> {
        self.rate_limiter.acquire().await;

        let request = ChatRequest { model, messages };
        let prompt_chars: usize = messages.iter().map(|m| m.content.len()).sum();
        debug!("发送翻译请求到: {} (model={}, {} 字符)", self.api_url, model, prompt_chars);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => {
                error!("提供商速率限制: {}", status);
                return Err(TranslationError::RateLimited);
            }
            StatusCode::PAYMENT_REQUIRED => {
                error!("提供商需要付费: {}", status);
                return Err(TranslationError::PaymentRequired);
            }
            _ => {}
        }

        let body = response.text().await?;
        if !status.is_success() {
            error!("提供商请求失败: {} - {}", status, body);
            return Err(TranslationError::Provider {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            error!("无法解析提供商响应: {} - {}", e, body);
            TranslationError::Provider {
                status: Some(status.as_u16()),
                message: format!("invalid response body: {}", e),
            }
        })?;

        parsed.into_content().ok_or_else(|| {
            error!("提供商响应缺少 choices[0].message.content: {}", body);
            TranslationError::Provider {
                status: Some(status.as_u16()),
                message: "response has no message content".to_string(),
            }
        })
    }
}
