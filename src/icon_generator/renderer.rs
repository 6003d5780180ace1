//! # 渲染模块
//!
//! ## 设计思路
//!
//! 单次渲染 = 缩放 → （可选）圆形遮罩 → PNG 编码。
//! 每次调用都分配恰好等于目标尺寸的新缓冲，不存在跨调用复用的画布，
//! 因此不会出现“小图残留像素渗入下一张大图”的问题。
//!
//! ## 实现思路
//!
//! 1. 校验目标尺寸、形状约束与质量范围
//! 2. `fast_image_resize` 卷积缩放（失败时回退 `image::imageops::resize`）
//! 3. 圆形条目按 4x4 超采样覆盖率计算边缘 alpha，圆外像素全透明
//! 4. 按质量档位选择 PNG 压缩参数编码

use fast_image_resize as fr;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ImageEncoder, Rgba, RgbaImage};

use super::config::png_settings_for_quality;
use super::manifest::Shape;
use super::source::SourceImage;
use super::IconError;

pub const PNG_MIME_TYPE: &str = "image/png";

const CIRCLE_SUBSAMPLES: u32 = 4;

/// 单个清单条目的渲染能力。
///
/// 流水线只依赖该 trait，便于替换编码实现或在测试中注入失败。
pub trait AssetRenderer: Send + Sync {
    fn render(
        &self,
        source: &SourceImage,
        width: u32,
        height: u32,
        shape: Shape,
        quality: u8,
    ) -> Result<Vec<u8>, IconError>;
}

/// 默认渲染器：缩放 + 圆形遮罩 + PNG 编码。
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    filter: FilterType,
}

impl PngRenderer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new(FilterType::Triangle)
    }
}

impl AssetRenderer for PngRenderer {
    fn render(
        &self,
        source: &SourceImage,
        width: u32,
        height: u32,
        shape: Shape,
        quality: u8,
    ) -> Result<Vec<u8>, IconError> {
        let canvas = render_pixels(source, width, height, shape, self.filter)?;
        encode_png(&canvas, quality)
    }
}

/// 使用默认滤镜渲染并编码单个图标。
///
/// # 示例
/// ```rust
/// use tauri_icon_generator::icon_generator::{render, Shape, SourceImage};
///
/// let source = SourceImage::from(image::RgbaImage::from_pixel(64, 64, image::Rgba([255, 0, 0, 255])));
/// let png = render(&source, 32, 32, Shape::Circle, 90)?;
/// assert!(!png.is_empty());
/// # Ok::<(), tauri_icon_generator::icon_generator::IconError>(())
/// ```
pub fn render(
    source: &SourceImage,
    width: u32,
    height: u32,
    shape: Shape,
    quality: u8,
) -> Result<Vec<u8>, IconError> {
    PngRenderer::default().render(source, width, height, shape, quality)
}

/// 生成目标尺寸的 RGBA 画布（未编码）。
pub(crate) fn render_pixels(
    source: &SourceImage,
    width: u32,
    height: u32,
    shape: Shape,
    filter: FilterType,
) -> Result<RgbaImage, IconError> {
    if width == 0 || height == 0 {
        return Err(IconError::Render(format!(
            "目标尺寸无效：{}x{}",
            width, height
        )));
    }
    if shape == Shape::Circle && width != height {
        return Err(IconError::Render(format!(
            "圆形图标必须为正方形：{}x{}",
            width, height
        )));
    }
    if source.width() == 0 || source.height() == 0 {
        return Err(IconError::Render("源图片为空".to_string()));
    }

    let mut canvas = match resize_with_fast_image_resize(source, width, height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}",
                err
            );
            image::imageops::resize(source.pixels(), width, height, filter)
        }
    };

    if shape == Shape::Circle {
        apply_circle_mask(&mut canvas);
    }

    Ok(canvas)
}

fn resize_with_fast_image_resize(
    source: &SourceImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbaImage, IconError> {
    let src_image = fr::images::ImageRef::new(
        source.width(),
        source.height(),
        source.pixels().as_raw(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| IconError::Render(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| IconError::Render(format!("fast_image_resize 执行失败：{}", e)))?;

    RgbaImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| IconError::Render("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}

/// 圆心 `(size/2, size/2)`、半径 `size/2` 之外的像素置为全透明。
fn apply_circle_mask(canvas: &mut RgbaImage) {
    let radius = canvas.width() as f64 / 2.0;
    let radius_sq = radius * radius;
    let samples = CIRCLE_SUBSAMPLES * CIRCLE_SUBSAMPLES;

    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let mut covered = 0u32;
        for sy in 0..CIRCLE_SUBSAMPLES {
            for sx in 0..CIRCLE_SUBSAMPLES {
                let px = x as f64 + (sx as f64 + 0.5) / CIRCLE_SUBSAMPLES as f64 - radius;
                let py = y as f64 + (sy as f64 + 0.5) / CIRCLE_SUBSAMPLES as f64 - radius;
                if px * px + py * py <= radius_sq {
                    covered += 1;
                }
            }
        }

        if covered == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
        } else if covered < samples {
            let alpha = (pixel[3] as u32 * covered + samples / 2) / samples;
            pixel[3] = alpha as u8;
        }
    }
}

fn encode_png(canvas: &RgbaImage, quality: u8) -> Result<Vec<u8>, IconError> {
    if !(1..=100).contains(&quality) {
        return Err(IconError::Render(format!(
            "quality 超出 1~100：{}",
            quality
        )));
    }

    let (compression, filter) = png_settings_for_quality(quality);
    let mut buf = Vec::new();
    PngEncoder::new_with_quality(&mut buf, compression, filter)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            image::ColorType::Rgba8.into(),
        )
        .map_err(|e| IconError::Render(format!("PNG 编码失败：{}", e)))?;
    Ok(buf)
}
