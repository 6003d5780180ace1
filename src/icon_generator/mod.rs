//! # 图标生成模块（icon_generator）
//!
//! ## 设计思路
//!
//! 该模块将“源图加载 → 逐条渲染 → 打包 → Tauri 命令暴露”按职责拆分为多个子模块，
//! 避免单文件膨胀与耦合。
//!
//! - `commands`：仅做 IPC 入参/出参适配（薄封装，`desktop` 特性）
//! - `service`：承载可注入状态与进度事件（`desktop` 特性）
//! - `handler`：编排整条生成流水线与运行状态
//! - `loader`：文件 / Base64 / 字节加载与解码校验（SVG 先栅格化）
//! - `renderer`：缩放、圆形遮罩、PNG 编码
//! - `manifest`：固定的输出清单
//! - `archive`：按路径收集结果并序列化为 zip
//! - `config/error/progress/source`：配置、错误、进度与中间数据模型
//!
//! ## 调用链
//!
//! ```text
//! 前端 invoke / CLI
//!    ↓
//! commands.rs（参数适配）
//!    ↓
//! service.rs（State 注入、进度事件）
//!    ↓
//! handler.rs（状态机 + 阶段耗时日志）
//!    ├─ loader.rs（解码 + 资源上限）
//!    ├─ renderer.rs（缩放 + 遮罩 + 编码）  × 清单条目
//!    └─ archive.rs（zip 序列化）
//!    ↓
//! GeneratedArchive（tauri-icons.zip）
//! ```

#[cfg(feature = "desktop")]
pub mod commands;
#[cfg(feature = "desktop")]
mod service;

mod archive;
mod config;
mod error;
mod handler;
mod loader;
mod manifest;
mod progress;
mod renderer;
mod source;

#[cfg(feature = "desktop")]
pub use commands::{
    cancel_icon_generation,
    clear_source_image,
    generate_icons,
    get_generation_status,
    get_icon_quality,
    list_icon_manifest,
    load_source_image,
    load_source_image_base64,
    set_icon_quality,
};
#[cfg(feature = "desktop")]
pub use service::{GenerationStatus, IconServiceState, ICON_GENERATION_PROGRESS_EVENT};

pub use archive::ArchiveBuilder;
pub use config::{
    parse_resize_filter,
    resize_filter_name,
    validate_quality,
    GeneratorConfig,
    ARCHIVE_FILE_NAME,
    DEFAULT_QUALITY,
};
pub use error::IconError;
pub use handler::IconGenerator;
pub use loader::{
    load_first_image_file,
    load_image,
    load_image_base64,
    load_image_file,
    SVG_RASTER_SIZE,
};
pub use manifest::{find_entry, ManifestEntry, Shape, ANDROID_DENSITIES, MANIFEST};
pub use progress::{GenerationJob, GenerationState, ProgressUpdate};
pub use renderer::{render, AssetRenderer, PngRenderer, PNG_MIME_TYPE};
pub use source::{GeneratedArchive, RenderedAsset, SourceImage, SourceSummary};
