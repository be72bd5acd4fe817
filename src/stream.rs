//! 流式进度模块
//!
//! 按顺序逐批翻译整页区块，并通过通道发送进度、完成或错误事件。
//! 每次运行恰好以一个 `complete` 或 `error` 事件结束。

use crate::batch::partition;
use crate::section::Section;
use crate::translator::TranslationService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// 事件通道容量
pub const EVENT_BUFFER: usize = 16;

/// 进度事件
///
/// 序列化格式即流式协议中 `data:` 之后的 JSON。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProgressEvent {
    /// 在第 `current_batch` 批的提供商调用开始之前发送
    #[serde(rename_all = "camelCase")]
    Progress {
        current_batch: usize,
        total_batches: usize,
        sections_translated: usize,
        total_sections: usize,
    },
    Complete {
        sections: Vec<Section>,
    },
    Error {
        #[serde(rename = "error")]
        message: String,
    },
}

impl ProgressEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProgressEvent::Progress { .. })
    }

    /// 渲染为一帧 `data: <JSON>\n\n`
    pub fn to_sse_frame(&self) -> serde_json::Result<String> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

/// 一次运行的结束方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed,
    /// 消费端断开，运行在批次边界停止
    Cancelled,
}

/// 整页翻译运行参数
#[derive(Debug, Clone)]
pub struct PageRun {
    pub sections: Vec<Section>,
    pub target_language: String,
    pub model: String,
}

impl TranslationService {
    /// 执行一次整页翻译
    ///
    /// 批次严格按顺序执行。每批开始前检查消费端是否仍在；提供商致命错误时发送
    /// `error` 事件并立即结束，不再尝试后续批次。
    ///
    /// # 参数
    ///
    /// * `run` - 区块、目标语言和模型
    /// * `tx` - 事件发送端，运行独占
    pub async fn run_page(&self, run: PageRun, tx: mpsc::Sender<ProgressEvent>) -> RunOutcome {
        let PageRun {
            sections,
            target_language,
            model,
        } = run;

        let batches = partition(&sections, self.batch_size());
        let total_batches = batches.len();
        let total_sections = sections.len();
        info!(
            "开始整页翻译: {} 个区块，{} 批，目标语言 {}",
            total_sections, total_batches, target_language
        );

        let mut translated: Vec<Section> = Vec::with_capacity(total_sections);

        for batch in &batches {
            if tx.is_closed() {
                info!("消费端已断开，停止于第 {} 批之前", batch.number);
                return RunOutcome::Cancelled;
            }

            let progress = ProgressEvent::Progress {
                current_batch: batch.number,
                total_batches,
                sections_translated: translated.len(),
                total_sections,
            };
            if tx.send(progress).await.is_err() {
                info!("消费端已断开，停止于第 {} 批之前", batch.number);
                return RunOutcome::Cancelled;
            }

            info!("翻译第 {}/{} 批", batch.number, total_batches);
            match self.translate_batch(batch, &target_language, &model).await {
                Ok(output) => translated.extend(output),
                Err(e) => {
                    error!("第 {} 批翻译失败，终止运行: {}", batch.number, e);
                    let _ = tx
                        .send(ProgressEvent::Error {
                            message: e.client_message(),
                        })
                        .await;
                    return RunOutcome::Failed;
                }
            }
        }

        info!("整页翻译完成: {} 个区块", translated.len());
        if tx
            .send(ProgressEvent::Complete {
                sections: translated,
            })
            .await
            .is_err()
        {
            return RunOutcome::Cancelled;
        }
        RunOutcome::Completed
    }

    /// 在后台任务中执行整页翻译，返回事件接收端
    ///
    /// 丢弃接收端即取消：运行会在下一个批次边界停止，进行中的调用完成后被丢弃。
    pub fn spawn_page_run(self: &Arc<Self>, run: PageRun) -> mpsc::Receiver<ProgressEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let service = Arc::clone(self);
        tokio::spawn(async move {
            service.run_page(run, tx).await;
        });
        rx
    }
}
