//! # Page Translator
//!
//! 落地页区块的分批机器翻译库。把页面的内容区块切分为固定大小的批次，逐批调用
//! OpenAI 兼容的文本生成接口，并通过事件流实时报告进度。
//!
//! ## 主要特性
//!
//! - **顺序分批**: 批次严格按顺序翻译，拼接结果即为原始区块顺序
//! - **字段白名单**: 只替换可翻译字段，`id`、`order`、图片和样式等字段原样保留
//! - **宽松提取**: 兼容 markdown 代码块包裹的 JSON，以及被折叠成单个对象的数组
//! - **批次回退**: 某一批回复无法解析时使用该批原文，运行继续
//! - **致命错误**: 429/402/其他提供商错误立即终止整次运行，不自动重试
//! - **可取消**: 丢弃事件接收端后，运行在下一个批次边界停止
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use page_translator::{PageRun, ProgressEvent, TranslationService, TranslatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = TranslatorConfig::load_from_default_locations();
//!     config.apply_env_overrides();
//!
//!     let service = Arc::new(TranslationService::new(&config)?);
//!     let sections = serde_json::from_str(r#"[{"id":"a","order":0,"type":"text","content":"Hello"}]"#)?;
//!
//!     let mut events = service.spawn_page_run(PageRun {
//!         sections,
//!         target_language: "fr".to_string(),
//!         model: service.resolve_model(None).to_string(),
//!     });
//!     while let Some(event) = events.recv().await {
//!         if let ProgressEvent::Complete { sections } = &event {
//!             println!("{}", serde_json::to_string_pretty(sections)?);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## 配置文件支持
//!
//! ```toml
//! [provider]
//! api_url = "http://localhost:11434/v1/chat/completions"
//! api_key = "sk-..."
//! model = "google/gemini-2.5-flash"
//! timeout_secs = 120
//! max_requests_per_second = 0.0
//!
//! [pipeline]
//! batch_size = 5
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod provider;
pub mod section;
pub mod server;
pub mod stream;
pub mod translator;
pub mod types;

pub use batch::{partition, Batch, DEFAULT_BATCH_SIZE};
pub use config::TranslatorConfig;
pub use error::{Result, TranslationError};
pub use extract::{extract_batch, extract_json, extract_section, BatchReply};
pub use prompt::{language_name, Payload, TranslationRequest, LANGUAGES};
pub use provider::{ChatProvider, HttpChatProvider, RateLimiter};
pub use section::{classify_value, FieldClassification, Section, SectionKind, TRANSLATABLE_FIELDS};
pub use stream::{PageRun, ProgressEvent, RunOutcome};
pub use translator::TranslationService;
pub use types::{ChatMessage, PipelineConfig, ProviderConfig, ServerConfig};
