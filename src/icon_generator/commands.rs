//! # Tauri 命令层
//!
//! ## 设计思路
//!
//! 命令层仅做 IPC 参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `IconServiceState`，保持命令函数薄、稳定、易测试。

use std::path::PathBuf;

use super::{service, IconError, ManifestEntry, SourceSummary, MANIFEST};
use tauri::{AppHandle, State, Wry};

#[derive(Debug, Clone, serde::Serialize)]
pub struct IconCommandError {
    pub code: &'static str,
    pub message: String,
}

impl From<IconError> for IconCommandError {
    fn from(error: IconError) -> Self {
        Self {
            code: error.code(),
            message: error.to_string(),
        }
    }
}

/// 加载拖放/选择的图片文件（多个时只取第一个）。
#[tauri::command]
pub fn load_source_image(
    state: State<'_, service::IconServiceState>,
    paths: Vec<String>,
) -> Result<SourceSummary, IconCommandError> {
    Ok(state.generator().load_files(&paths)?)
}

/// 加载前端读取的 Data URL / Base64 图片。
#[tauri::command]
pub fn load_source_image_base64(
    state: State<'_, service::IconServiceState>,
    data: String,
) -> Result<SourceSummary, IconCommandError> {
    Ok(state.generator().load_base64(&data)?)
}

#[tauri::command]
pub fn clear_source_image(
    state: State<'_, service::IconServiceState>,
) -> Result<(), crate::error::AppError> {
    state.generator().clear_source()?;
    Ok(())
}

#[tauri::command]
pub fn set_icon_quality(
    state: State<'_, service::IconServiceState>,
    quality: u8,
) -> Result<(), crate::error::AppError> {
    state.generator().set_quality(quality)?;
    Ok(())
}

#[tauri::command]
pub fn get_icon_quality(
    state: State<'_, service::IconServiceState>,
) -> Result<u8, crate::error::AppError> {
    Ok(state.generator().quality()?)
}

#[tauri::command]
pub fn get_generation_status(
    state: State<'_, service::IconServiceState>,
) -> Result<service::GenerationStatus, crate::error::AppError> {
    Ok(state.status()?)
}

/// 生成全部图标并保存 `tauri-icons.zip` 到指定目录，返回文件路径。
#[tauri::command]
pub async fn generate_icons(
    state: State<'_, service::IconServiceState>,
    app: AppHandle<Wry>,
    output_dir: String,
) -> Result<String, IconCommandError> {
    let path = state
        .generate_to_dir(&app, PathBuf::from(output_dir))
        .await
        .map_err(IconCommandError::from)?;
    Ok(path.to_string_lossy().to_string())
}

#[tauri::command]
pub fn cancel_icon_generation(state: State<'_, service::IconServiceState>) -> bool {
    state.generator().cancel()
}

#[tauri::command]
pub fn list_icon_manifest() -> Vec<ManifestEntry> {
    MANIFEST.to_vec()
}
