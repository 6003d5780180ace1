//! # 进度模型
//!
//! `GenerationJob` 只在一次生成内存在，由流水线独占修改；
//! `ProgressUpdate` 是对外发布的快照（前端事件 / CLI 输出 / 通道消息）。

use serde::Serialize;

/// 生成状态机：`Idle → Running → {Completed, Failed} → Idle`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl GenerationState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Completed,
            3 => Self::Failed,
            _ => Self::Idle,
        }
    }

    pub(crate) fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Completed => 2,
            Self::Failed => 3,
        }
    }
}

/// 单次进度快照。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub state: GenerationState,
    pub processed: usize,
    pub total: usize,
    /// 0~100。
    pub percent: u8,
    /// 刚完成的条目路径（终态事件为 `None`）。
    pub output_path: Option<String>,
    pub error_code: Option<&'static str>,
    pub error_message: Option<String>,
}

/// 一次生成的运行计数。
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub total_entries: usize,
    pub processed_count: usize,
    pub quality_percent: u8,
}

impl GenerationJob {
    pub fn new(total_entries: usize, quality_percent: u8) -> Self {
        Self {
            total_entries,
            processed_count: 0,
            quality_percent,
        }
    }

    /// 完成一个条目并返回最新百分比。
    pub fn advance(&mut self) -> u8 {
        self.processed_count = (self.processed_count + 1).min(self.total_entries);
        self.percent()
    }

    /// `round(processed / total * 100)`，四舍五入。
    pub fn percent(&self) -> u8 {
        percent_of(self.processed_count, self.total_entries)
    }

    pub(crate) fn running_update(&self, output_path: &str) -> ProgressUpdate {
        ProgressUpdate {
            state: GenerationState::Running,
            processed: self.processed_count,
            total: self.total_entries,
            percent: self.percent(),
            output_path: Some(output_path.to_string()),
            error_code: None,
            error_message: None,
        }
    }
}

pub(crate) fn percent_of(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (processed.min(total) * 100 + total / 2) / total;
    scaled as u8
}
