//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `GeneratorConfig`，保证运行时行为可观测、可调整、可测试。
//! 面向用户的只有 `quality`（1~100），其余字段是解码资源上限与缩放滤镜等底层参数。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置（质量 90、双线性缩放）。
//! - `validate_quality` 统一校验质量范围，命令层与 CLI 共用。
//! - `png_settings_for_quality` 把质量百分比映射为 PNG 编码参数。
//! - `parse_resize_filter` 负责滤镜名称解析与反向输出。

use image::codecs::png::{CompressionType, FilterType as PngFilterType};
use image::imageops::FilterType;

use super::IconError;

/// 默认输出质量。
pub const DEFAULT_QUALITY: u8 = 90;

/// 输出压缩包文件名（Tauri 工具链约定）。
pub const ARCHIVE_FILE_NAME: &str = "tauri-icons.zip";

/// 图标生成配置。
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// PNG 输出质量（1~100），整次生成统一生效。
    pub quality: u8,
    /// 缩放滤镜策略。
    pub resize_filter: FilterType,
    /// 读取源文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 输出压缩包允许的最大体积（字节）。
    pub max_archive_size: u64,
    /// 输出压缩包文件名。
    pub archive_file_name: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            resize_filter: FilterType::Triangle,
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            max_archive_size: 512 * 1024 * 1024,
            archive_file_name: ARCHIVE_FILE_NAME.to_string(),
        }
    }
}

/// 校验质量参数是否处于 1~100。
pub fn validate_quality(quality: u8) -> Result<u8, IconError> {
    if !(1..=100).contains(&quality) {
        return Err(IconError::InvalidConfig(format!(
            "quality 必须在 1~100 之间（当前：{}）",
            quality
        )));
    }
    Ok(quality)
}

/// 将质量百分比映射为 PNG 编码参数。
///
/// PNG 为无损格式，质量只影响压缩力度：质量越高越偏向快速、体积更大的编码，
/// 质量越低越偏向最小体积。像素内容在任意质量下保持一致。
pub(crate) fn png_settings_for_quality(quality: u8) -> (CompressionType, PngFilterType) {
    match quality {
        0..=33 => (CompressionType::Best, PngFilterType::Adaptive),
        34..=66 => (CompressionType::Default, PngFilterType::Adaptive),
        _ => (CompressionType::Fast, PngFilterType::Adaptive),
    }
}

/// 从外部字符串解析缩放滤镜。
///
/// # 示例
/// ```rust
/// use tauri_icon_generator::icon_generator::parse_resize_filter;
///
/// let filter = parse_resize_filter("bilinear")?;
/// assert_eq!(filter, image::imageops::FilterType::Triangle);
/// # Ok::<(), tauri_icon_generator::icon_generator::IconError>(())
/// ```
pub fn parse_resize_filter(name: &str) -> Result<FilterType, IconError> {
    match name.trim().to_lowercase().as_str() {
        "nearest" => Ok(FilterType::Nearest),
        "bilinear" | "triangle" => Ok(FilterType::Triangle),
        "catmullrom" | "catmull-rom" => Ok(FilterType::CatmullRom),
        "gaussian" => Ok(FilterType::Gaussian),
        "lanczos3" | "lanczos" => Ok(FilterType::Lanczos3),
        other => Err(IconError::InvalidConfig(format!(
            "未知缩放滤镜：{}（可选：nearest / bilinear / catmullrom / gaussian / lanczos3）",
            other
        ))),
    }
}

/// 将滤镜输出为稳定字符串，供日志与前端展示。
pub fn resize_filter_name(filter: FilterType) -> &'static str {
    match filter {
        FilterType::Nearest => "nearest",
        FilterType::Triangle => "bilinear",
        FilterType::CatmullRom => "catmullrom",
        FilterType::Gaussian => "gaussian",
        FilterType::Lanczos3 => "lanczos3",
    }
}
