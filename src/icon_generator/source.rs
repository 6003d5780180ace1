//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入”和“流水线中间结果”解耦：
//! - `SourceImage` 表示已解码、只读共享的源位图
//! - `RenderedAsset` 表示单个清单条目的编码结果
//! - `GeneratedArchive` 表示一次成功生成交给调用方的压缩包

use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Serialize;

use super::IconError;

/// 已解码的源图片。
///
/// 创建后不可变，一次生成中被所有渲染调用只读共享。
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
    /// 来源提示（用于日志与诊断）。
    source_hint: &'static str,
}

impl SourceImage {
    pub(crate) fn new(pixels: RgbaImage, source_hint: &'static str) -> Self {
        Self {
            pixels,
            source_hint,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn source_hint(&self) -> &'static str {
        self.source_hint
    }

    pub fn summary(&self) -> SourceSummary {
        SourceSummary {
            width: self.width(),
            height: self.height(),
            source_hint: self.source_hint,
        }
    }
}

/// 源图片概要，供前端展示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    pub width: u32,
    pub height: u32,
    pub source_hint: &'static str,
}

impl From<RgbaImage> for SourceImage {
    fn from(pixels: RgbaImage) -> Self {
        Self::new(pixels, "memory")
    }
}

/// 单个条目的渲染结果。
#[derive(Debug, Clone)]
pub struct RenderedAsset {
    pub output_path: String,
    pub encoded_bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// 一次成功生成的产物。
#[derive(Debug, Clone)]
pub struct GeneratedArchive {
    /// 建议的保存文件名（默认 `tauri-icons.zip`）。
    pub file_name: String,
    /// zip 字节。
    pub bytes: Vec<u8>,
    /// 压缩包内的文件数。
    pub entry_count: usize,
}

impl GeneratedArchive {
    /// 将压缩包写入目录（不存在时自动创建），返回最终文件路径。
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, IconError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| {
                IconError::FileSystem(format!("创建输出目录 '{}' 失败：{}", dir.display(), e))
            })?;
        }

        let target = dir.join(&self.file_name);
        std::fs::write(&target, &self.bytes).map_err(|e| {
            IconError::FileSystem(format!("写入压缩包 '{}' 失败：{}", target.display(), e))
        })?;

        log::info!(
            "💾 压缩包已保存 - 路径: {} 大小: {}KB 文件数: {}",
            target.display(),
            self.bytes.len() / 1024,
            self.entry_count
        );
        Ok(target)
    }
}
