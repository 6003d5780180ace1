//! # 加载与解码模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（原始字节 / Base64 / 本地文件）的源图加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! 1. 文件：存在性 + metadata 体积限制 + 读取
//! 2. Base64：Data URL / 纯 Base64 解析 + 预估体积限制
//! 3. 字节：签名识别 → 读取 header 尺寸 → 像素/内存上限 → 完整解码 → 转 RGBA
//! 4. SVG：`resvg` 按长边 1024 栅格化一次，之后与位图走同一条渲染路径

use base64::{Engine as _, engine::general_purpose};
use image::{GenericImageView, ImageReader, Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::io::Cursor;
use std::path::Path;

use super::source::SourceImage;
use super::{GeneratorConfig, IconError};

/// SVG 栅格化后的长边像素数（清单中最大的输出尺寸）。
pub const SVG_RASTER_SIZE: u32 = 1024;

/// 从内存字节解码源图片。
pub fn load_image(bytes: &[u8], config: &GeneratorConfig) -> Result<SourceImage, IconError> {
    decode_source(bytes, config, "bytes")
}

/// 从本地路径加载源图片。
pub fn load_image_file(
    path: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<SourceImage, IconError> {
    let file_path = path.as_ref();
    log::info!("📁 开始读取源图片 - 路径: {}", file_path.display());

    if !file_path.exists() {
        return Err(IconError::FileSystem(format!(
            "文件不存在：{}",
            file_path.display()
        )));
    }

    let metadata = std::fs::metadata(file_path)
        .map_err(|e| IconError::FileSystem(format!("无法读取文件信息：{}", e)))?;

    if metadata.len() > config.max_file_size {
        return Err(IconError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            metadata.len() as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    let bytes = std::fs::read(file_path)
        .map_err(|e| IconError::FileSystem(format!("无法读取图片文件：{}", e)))?;

    decode_source(&bytes, config, "file")
}

/// 从多个候选路径中加载第一个（拖放多文件时只取首个）。
pub fn load_first_image_file<P: AsRef<Path>>(
    paths: &[P],
    config: &GeneratorConfig,
) -> Result<SourceImage, IconError> {
    let first = paths
        .first()
        .ok_or_else(|| IconError::FileSystem("未提供任何文件".to_string()))?;

    if paths.len() > 1 {
        log::warn!("⚠️ 收到 {} 个文件，仅使用第一个", paths.len());
    }

    load_image_file(first, config)
}

/// 从 Base64 字符串（支持 Data URL）加载源图片。
pub fn load_image_base64(data: &str, config: &GeneratorConfig) -> Result<SourceImage, IconError> {
    log::info!("📝 开始处理 base64 源图片");

    let bytes = parse_base64_with_limit(data, config.max_file_size)?;
    if bytes.len() as u64 > config.max_file_size {
        return Err(IconError::ResourceLimit(format!(
            "Base64 解码后体积过大：{:.2} MB（限制：{:.2} MB）",
            bytes.len() as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    decode_source(&bytes, config, "base64")
}

fn decode_source(
    bytes: &[u8],
    config: &GeneratorConfig,
    source_hint: &'static str,
) -> Result<SourceImage, IconError> {
    if bytes.is_empty() {
        return Err(IconError::Decode("图片内容为空".to_string()));
    }

    if looks_like_svg(bytes) {
        let pixels = rasterize_svg(bytes, config)?;
        log::info!(
            "✅ SVG 栅格化成功 - 来源: {} 尺寸: {}x{}",
            source_hint,
            pixels.width(),
            pixels.height()
        );
        return Ok(SourceImage::new(pixels, source_hint));
    }

    validate_image_signature(bytes)?;

    let (header_width, header_height) = inspect_dimensions_from_memory(bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| IconError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(IconError::Decode("图片尺寸为 0".to_string()));
    }
    validate_pixel_limits(config, width, height)?;

    if width != height {
        log::warn!("⚠️ 源图片非正方形（{}x{}），输出将被拉伸", width, height);
    }

    log::info!(
        "✅ 源图片解码成功 - 来源: {} 尺寸: {}x{}",
        source_hint,
        width,
        height
    );

    Ok(SourceImage::new(decoded.to_rgba8(), source_hint))
}

/// 仅通过内存中的图片头信息读取宽高。
fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), IconError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| IconError::Decode(format!("无法识别图片格式：{}", e)))?
        .into_dimensions()
        .map_err(|e| IconError::Decode(format!("无法读取图片尺寸：{}", e)))
}

/// 校验像素数量与预计解码内存是否超过配置上限。
fn validate_pixel_limits(config: &GeneratorConfig, width: u32, height: u32) -> Result<(), IconError> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| IconError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(IconError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    let estimated = pixels
        .checked_mul(4)
        .ok_or_else(|| IconError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

    if estimated > config.max_decoded_bytes {
        return Err(IconError::ResourceLimit(format!(
            "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
            estimated as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}

/// 通过文件签名（magic bytes）校验输入是否为可解码的位图。
fn validate_image_signature(bytes: &[u8]) -> Result<(), IconError> {
    if bytes.is_empty() {
        return Err(IconError::Decode("图片内容为空".to_string()));
    }

    if let Some(kind) = infer::get(bytes) {
        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(IconError::Decode(format!(
                "文件签名不是图片类型：{}",
                kind.mime_type()
            )));
        }
    }

    Ok(())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    // 截断处可能切开多字节字符，按有损方式解码头部
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let text = head.trim_start_matches('\u{feff}').trim_start();
    text.starts_with('<') && text.contains("<svg")
}

/// 将 SVG 栅格化为 RGBA，长边固定为 `SVG_RASTER_SIZE`，保持宽高比。
fn rasterize_svg(bytes: &[u8], config: &GeneratorConfig) -> Result<RgbaImage, IconError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &options)
        .map_err(|e| IconError::Decode(format!("SVG 解析失败：{}", e)))?;

    let size = tree.size();
    let (width, height) = svg_raster_dimensions(size.width(), size.height());
    validate_pixel_limits(config, width, height)?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        IconError::ResourceLimit(format!("无法分配 SVG 画布：{}x{}", width, height))
    })?;
    let transform = tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny_skia 输出为预乘 alpha，转回直通 alpha
    let mut pixels = RgbaImage::new(width, height);
    for (dst, src) in pixels.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    Ok(pixels)
}

fn svg_raster_dimensions(width: f32, height: f32) -> (u32, u32) {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return (SVG_RASTER_SIZE, SVG_RASTER_SIZE);
    }

    let target = SVG_RASTER_SIZE as f32;
    let scale = target / width.max(height);
    let scaled = |v: f32| (v * scale).round().clamp(1.0, target) as u32;
    (scaled(width), scaled(height))
}

fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, IconError> {
    let len = base64_data.trim().len() as u64;
    let groups = len
        .checked_add(3)
        .ok_or_else(|| IconError::ResourceLimit("Base64 输入长度溢出".to_string()))?
        / 4;

    groups
        .checked_mul(3)
        .ok_or_else(|| IconError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
}

fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, IconError> {
    let normalized = data.trim();

    let base64_data = if normalized.starts_with("data:") {
        let base64_start = normalized
            .find(";base64,")
            .ok_or_else(|| IconError::Decode("缺少 base64 标记".to_string()))?;
        &normalized[base64_start + 8..]
    } else {
        normalized
    };

    let estimated_len = estimate_base64_decoded_upper_bound_len(base64_data)?;
    if estimated_len > max_file_size {
        return Err(IconError::ResourceLimit(format!(
            "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
            estimated_len as f64 / 1024.0 / 1024.0,
            max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    general_purpose::STANDARD
        .decode(base64_data)
        .map_err(|e| IconError::Decode(format!("Base64 解码失败：{}", e)))
}
