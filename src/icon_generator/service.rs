//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `IconServiceState` 作为 Tauri 注入状态，替代全局单例函数。
//! 生命周期由 `main.rs` 统一管理，测试可直接构造 `IconGenerator`。
//!
//! ## 实现思路
//!
//! - 生成在阻塞线程池执行，进度经通道回到异步侧再 `emit` 给前端，界面始终可响应。
//! - 成功后把压缩包写入用户选择的目录，失败时不落盘任何文件。

use std::path::PathBuf;
use std::sync::Arc;

use tauri::{AppHandle, Emitter, Wry};
use tokio::sync::mpsc;

use super::{
    GenerationState, GeneratorConfig, IconError, IconGenerator, ProgressUpdate, SourceSummary,
};

pub const ICON_GENERATION_PROGRESS_EVENT: &str = "icon-generation-progress";

/// 前端状态面板所需的快照。
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationStatus {
    pub generating: bool,
    pub progress: u8,
    pub state: GenerationState,
    pub quality: u8,
    pub source: Option<SourceSummary>,
}

/// 图标生成服务状态。
///
/// 作为 Tauri `State` 注入到命令层，内部持有 `IconGenerator`。
pub struct IconServiceState {
    generator: Arc<IconGenerator>,
}

impl IconServiceState {
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            generator: Arc::new(IconGenerator::new(config)),
        }
    }

    pub fn generator(&self) -> &IconGenerator {
        &self.generator
    }

    pub fn status(&self) -> Result<GenerationStatus, IconError> {
        Ok(GenerationStatus {
            generating: self.generator.is_generating(),
            progress: self.generator.progress(),
            state: self.generator.state(),
            quality: self.generator.quality()?,
            source: self.generator.source_summary()?,
        })
    }

    /// 执行一次生成并把 `tauri-icons.zip` 写入 `output_dir`。
    pub async fn generate_to_dir(
        &self,
        app: &AppHandle<Wry>,
        output_dir: PathBuf,
    ) -> Result<PathBuf, IconError> {
        let (tx, mut rx) = mpsc::unbounded_channel::<ProgressUpdate>();

        let emitter = app.clone();
        let forwarder = tauri::async_runtime::spawn(async move {
            while let Some(update) = rx.recv().await {
                if let Err(err) = emitter.emit(ICON_GENERATION_PROGRESS_EVENT, &update) {
                    log::warn!("⚠️ 进度事件发送失败: {}", err);
                }
            }
        });

        let result = self.generator.generate_in_background(tx).await;
        if let Err(err) = forwarder.await {
            log::warn!("⚠️ 进度转发任务异常结束: {}", err);
        }

        let archive = result?;
        archive.save_to_dir(&output_dir)
    }
}

impl Default for IconServiceState {
    fn default() -> Self {
        Self::new()
    }
}
