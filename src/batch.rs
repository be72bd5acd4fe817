//! 批次划分模块
//!
//! 将有序的区块序列切分为固定大小、保持顺序的批次。

use crate::section::Section;

/// 默认每批区块数
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// 一个批次
///
/// `number` 从 1 开始；按编号顺序拼接所有批次即得到原始区块序列。
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub number: usize,
    pub sections: Vec<Section>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// 切分区块序列
///
/// # 参数
///
/// * `sections` - 页面的全部区块，按显示顺序排列
/// * `batch_size` - 每批区块数，为 0 时按 1 处理
///
/// # 返回
///
/// 除最后一批外每批恰好 `batch_size` 个区块；输入为空时返回空列表。
pub fn partition(sections: &[Section], batch_size: usize) -> Vec<Batch> {
    sections
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(i, chunk)| Batch {
            number: i + 1,
            sections: chunk.to_vec(),
        })
        .collect()
}
