//! 响应提取模块
//!
//! 从提供商的自由文本回复中恢复 JSON。对 markdown 代码块包裹宽松，
//! 对最终结果严格：必须是合法 JSON。

use crate::error::{Result, TranslationError};
use serde::Deserialize;
use serde_json::Value;

const FENCE: &str = "```";

/// 批次回复的两种形态
///
/// 提供商有时会把只有一个元素的数组折叠成单个对象。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BatchReply {
    Many(Vec<Value>),
    One(Value),
}

impl BatchReply {
    /// 统一为序列
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            BatchReply::Many(items) => items,
            BatchReply::One(item) => vec![item],
        }
    }
}

/// 取出第一个代码块中的内容，没有完整代码块时返回 None
fn fenced_content(reply: &str) -> Option<&str> {
    let start = reply.find(FENCE)? + FENCE.len();
    let body = &reply[start..];
    let body = match body.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &body[4..],
        _ => body,
    };
    let end = body.find(FENCE)?;
    Some(&body[..end])
}

/// 提取并解析 JSON
///
/// # 返回
///
/// * `Ok(Value)` - 解析结果，不校验结构
/// * `Err(TranslationError::ExtractionFailed)` - 不是合法 JSON，附带原始回复
pub fn extract_json(reply: &str) -> Result<Value> {
    let candidate = fenced_content(reply).unwrap_or(reply).trim();
    serde_json::from_str(candidate).map_err(|e| TranslationError::ExtractionFailed {
        message: e.to_string(),
        raw: reply.to_string(),
    })
}

/// 批次路径：提取后归一化为序列
pub fn extract_batch(reply: &str) -> Result<Vec<Value>> {
    let value = extract_json(reply)?;
    let shape = serde_json::from_value::<BatchReply>(value.clone())
        .unwrap_or(BatchReply::One(value));
    Ok(shape.into_vec())
}

/// 单区块路径
pub fn extract_section(reply: &str) -> Result<Value> {
    extract_json(reply)
}
