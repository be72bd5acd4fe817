//! 翻译请求构建模块
//!
//! 生成发送给提供商的指令文本与载荷。载荷是区块的原样序列化结果，
//! 不重排、不重命名字段，提取阶段依赖提供商返回结构相同的数据。

use crate::error::{Result, TranslationError};
use crate::section::Section;
use crate::types::ChatMessage;

/// 语言代码到语言名称的固定映射，仅用于组织指令文本
pub const LANGUAGES: &[(&str, &str)] = &[
    ("fr", "French"),
    ("it", "Italian"),
    ("nl", "Dutch"),
    ("de", "German"),
    ("ro", "Romanian"),
    ("cs", "Czech"),
    ("pl", "Polish"),
    ("hu", "Hungarian"),
];

/// 查找语言名称，未知代码原样返回
pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// 请求载荷：一个批次或单个区块
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    Batch(&'a [Section]),
    Section(&'a Section),
}

/// 一次翻译请求
#[derive(Debug, Clone, Copy)]
pub struct TranslationRequest<'a> {
    pub target_language: &'a str,
    pub model: &'a str,
    pub payload: Payload<'a>,
}

impl<'a> TranslationRequest<'a> {
    pub fn batch(target_language: &'a str, model: &'a str, sections: &'a [Section]) -> Self {
        Self {
            target_language,
            model,
            payload: Payload::Batch(sections),
        }
    }

    pub fn section(target_language: &'a str, model: &'a str, section: &'a Section) -> Self {
        Self {
            target_language,
            model,
            payload: Payload::Section(section),
        }
    }

    /// 构建 system + user 两条消息
    ///
    /// # 返回
    ///
    /// * `Ok(Vec<ChatMessage>)` - 指令与载荷
    /// * `Err(TranslationError::Validation)` - 载荷无法序列化
    pub fn messages(&self) -> Result<Vec<ChatMessage>> {
        let language = language_name(self.target_language);
        let (payload, shape) = match self.payload {
            Payload::Batch(sections) => (serde_json::to_string_pretty(sections), "JSON array"),
            Payload::Section(section) => (serde_json::to_string_pretty(section), "JSON object"),
        };
        let payload = payload.map_err(|e| {
            TranslationError::Validation(format!("Failed to serialize payload: {}", e))
        })?;

        Ok(vec![
            ChatMessage::system(instructions(language, shape)),
            ChatMessage::user(format!(
                "Translate the following {} to {}:\n\n{}",
                shape, language, payload
            )),
        ])
    }
}

fn instructions(language: &str, shape: &str) -> String {
    format!(
        r#"You are a professional translator for website landing pages. Translate the provided content sections to {language}.

Rules:
1. Translate ONLY these fields: content, heading, ctaText, author, authorRole, verifiedText, buttonText, and every string inside items.
2. Preserve all HTML markup inside those fields exactly as given: tags, attributes and entities must stay byte-for-byte identical, only the human-readable text between them is translated.
3. Leave every other field unchanged, including id, order, type, imageUrl, imagePosition and style.
4. Do not add, remove, rename or reorder fields or sections.
5. Return ONLY a valid {shape} with the same structure as the input. No explanations, no surrounding prose."#
    )
}
