#![allow(dead_code)]

use async_trait::async_trait;
use page_translator::{ChatMessage, ChatProvider, Result, Section, TranslationError};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted provider outcome.
pub enum Reply {
    Text(String),
    Fail(fn() -> TranslationError),
}

/// Provider that answers calls from a fixed script, in order.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Reply>>,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Reply>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn complete(&self, _model: &str, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(make)) => Err(make()),
            None => Err(TranslationError::Provider {
                status: Some(500),
                message: "script exhausted".to_string(),
            }),
        }
    }
}

pub fn section(i: usize) -> Section {
    Section::new(json!({
        "id": format!("s{}", i),
        "order": i,
        "type": "text",
        "content": format!("<p>Hello <b>{}</b></p>", i),
        "imageUrl": format!("https://cdn.example.com/{}.png", i),
        "style": {"align": "center"}
    }))
}

pub fn sections(n: usize) -> Vec<Section> {
    (0..n).map(section).collect()
}

pub fn order_of(section: &Section) -> u64 {
    section.get("order").and_then(Value::as_u64).unwrap()
}

/// A fenced JSON reply translating every section in `batch` to "<p>Bonjour <b>i</b></p>".
pub fn french_reply(batch: &[Section]) -> Reply {
    let items: Vec<Value> = batch
        .iter()
        .map(|s| {
            json!({
                "id": s.id(),
                "order": s.get("order"),
                "type": "text",
                "content": french(order_of(s)),
                "imageUrl": "https://rewritten.example.com/x.png",
                "style": {"align": "left"}
            })
        })
        .collect();
    Reply::Text(format!("```json\n{}\n```", Value::Array(items)))
}

pub fn french(order: u64) -> String {
    format!("<p>Bonjour <b>{}</b></p>", order)
}
