//! 页面区块模型
//!
//! 区块以调用方提交的原始 JSON 为准保存，键顺序、`null` 值和未知字段都原样保留。
//! 可翻译字段与透传字段的划分固定，与 `type` 无关：透传字段在翻译前后必须逐字节相同。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields whose values are sent for translation. `items` is a list of strings,
/// everything else is a string.
pub const TRANSLATABLE_FIELDS: &[&str] = &[
    "content",
    "heading",
    "ctaText",
    "author",
    "authorRole",
    "verifiedText",
    "buttonText",
    "items",
];

const LIST_FIELD: &str = "items";

/// 区块类型
///
/// 只用于日志与诊断，字段划分不依赖它。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Hero,
    Text,
    Image,
    Cta,
    Benefits,
    Testimonial,
    Other(String),
}

impl From<&str> for SectionKind {
    fn from(value: &str) -> Self {
        match value {
            "hero" => SectionKind::Hero,
            "text" => SectionKind::Text,
            "image" => SectionKind::Image,
            "cta" => SectionKind::Cta,
            "benefits" => SectionKind::Benefits,
            "testimonial" => SectionKind::Testimonial,
            other => SectionKind::Other(other.to_string()),
        }
    }
}

/// 页面内容区块
///
/// 任意 JSON 值都是合法区块。不是对象的值没有可翻译字段，整体透传。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section(Value);

/// 字段划分结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldClassification {
    /// 存在且可翻译的字段
    pub translatable: Vec<String>,
    /// 存在且必须透传的字段
    pub passthrough: Vec<String>,
}

/// 对任意 JSON 值做字段划分
///
/// 白名单字段只有在值为字符串（`items` 为数组）时才可翻译；`null` 或其他类型的值
/// 归入透传。非对象的值视为无法识别的结构：没有可翻译字段，整体透传。
pub fn classify_value(value: &Value) -> FieldClassification {
    let Some(object) = value.as_object() else {
        return FieldClassification::default();
    };

    let mut classification = FieldClassification::default();
    for (key, field) in object {
        if is_translatable(key, field) {
            classification.translatable.push(key.clone());
        } else {
            classification.passthrough.push(key.clone());
        }
    }
    classification
}

fn is_translatable(key: &str, value: &Value) -> bool {
    if !TRANSLATABLE_FIELDS.contains(&key) {
        return false;
    }
    if key == LIST_FIELD {
        value.is_array()
    } else {
        value.is_string()
    }
}

/// Translated value for one field, or `None` when the candidate would change
/// its type or shape.
fn translated_field(field: &str, original: &Value, candidate: &Value) -> Option<Value> {
    if field != LIST_FIELD {
        return candidate.is_string().then(|| candidate.clone());
    }

    let (original, candidate) = (original.as_array()?, candidate.as_array()?);
    if original.len() != candidate.len() {
        return None;
    }
    let items = original
        .iter()
        .zip(candidate)
        .map(|(before, after)| match (before, after) {
            (Value::String(_), Value::String(_)) => after.clone(),
            _ => before.clone(),
        })
        .collect();
    Some(Value::Array(items))
}

impl Section {
    pub fn new(value: Value) -> Self {
        Section(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// 读取顶层字段，区块不是对象时返回 None
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// 读取字符串字段
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&Value> {
        self.get("id")
    }

    pub fn kind(&self) -> Option<SectionKind> {
        self.text("type").map(SectionKind::from)
    }

    /// 返回本区块中存在的可翻译字段与透传字段
    pub fn classify(&self) -> FieldClassification {
        classify_value(&self.0)
    }

    /// 将提供商返回的译文合并到原区块上
    ///
    /// 只替换可翻译字段，且仅当译文值的 JSON 类型一致时替换；`items` 要求长度一致，
    /// 并逐项只替换原本是字符串的元素。其余字段、键顺序一律取自原区块。
    pub fn merge_translation(&self, translated: &Value) -> Section {
        let (Some(reply), Value::Object(_)) = (translated.as_object(), &self.0) else {
            return self.clone();
        };

        let mut merged = self.0.clone();
        if let Value::Object(fields) = &mut merged {
            for field in self.classify().translatable {
                let (Some(original), Some(candidate)) = (fields.get(&field), reply.get(&field)) else {
                    continue;
                };
                if let Some(value) = translated_field(&field, original, candidate) {
                    fields.insert(field, value);
                }
            }
        }
        Section(merged)
    }
}

impl From<Value> for Section {
    fn from(value: Value) -> Self {
        Section(value)
    }
}

/// 将一批译文按 `id`（找不到时按位置）匹配回原区块
///
/// 按位置匹配时，带有其他 `id` 的译文条目不会被采用。返回的区块数量和顺序
/// 与 `originals` 完全一致，缺少对应译文的区块保持原样。
pub fn merge_batch(originals: &[Section], translated: &[Value]) -> Vec<Section> {
    originals
        .iter()
        .enumerate()
        .map(|(index, original)| {
            let id = original.id().filter(|id| !id.is_null());
            let by_id = id.and_then(|id| {
                translated
                    .iter()
                    .find(|candidate| candidate.get("id") == Some(id))
            });
            let by_position = translated
                .get(index)
                .filter(|candidate| match candidate.get("id") {
                    Some(candidate_id) => Some(candidate_id) == id,
                    None => true,
                });
            match by_id.or(by_position) {
                Some(reply) => original.merge_translation(reply),
                None => original.clone(),
            }
        })
        .collect()
}
