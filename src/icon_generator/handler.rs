//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `IconGenerator` 负责流程编排与状态管理，不直接与 Tauri 绑定。
//! 一次生成固定为：
//! 1. 读取配置快照与当前源图
//! 2. 按清单顺序逐条渲染并写入压缩包
//! 3. 每完成一条发布进度
//! 4. 全部成功后序列化压缩包交给调用方
//!
//! ## 实现思路
//!
//! - 配置通过 `RwLock<GeneratorConfig>` 支持运行时调整，单次生成内使用同一快照。
//! - 源图以 `Arc<SourceImage>` 只读共享，替换源图不影响进行中的生成。
//! - `generating / progress / state` 使用原子量，前端轮询无需加锁。
//! - 任意错误立即中止，不产出半成品；`RunGuard` 保证无论成败都回到 `Idle`。
//! - `generate_in_background` 把整条流水线放到阻塞线程池，进度经通道回传。

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use image::imageops::FilterType;
use tokio::sync::mpsc;

use super::archive::ArchiveBuilder;
use super::config::{resize_filter_name, validate_quality};
use super::loader;
use super::manifest::MANIFEST;
use super::progress::{GenerationJob, GenerationState, ProgressUpdate};
use super::renderer::{AssetRenderer, PngRenderer, PNG_MIME_TYPE};
use super::source::{GeneratedArchive, RenderedAsset, SourceImage, SourceSummary};
use super::{GeneratorConfig, IconError};

/// 图标生成器。
pub struct IconGenerator {
    config: RwLock<GeneratorConfig>,
    source: RwLock<Option<Arc<SourceImage>>>,
    renderer: Option<Arc<dyn AssetRenderer>>,
    generating: AtomicBool,
    progress: AtomicU8,
    state: AtomicU8,
    cancel_requested: AtomicBool,
}

/// 生成结束时（无论成败）把运行态复位为 `Idle`。
struct RunGuard<'a> {
    generator: &'a IconGenerator,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.generator.progress.store(0, Ordering::Release);
        self.generator
            .state
            .store(GenerationState::Idle.as_u8(), Ordering::Release);
        self.generator.cancel_requested.store(false, Ordering::Release);
        self.generator.generating.store(false, Ordering::Release);
    }
}

impl IconGenerator {
    /// 根据初始配置创建生成器，使用默认 PNG 渲染器。
    ///
    /// # 示例
    /// ```rust
    /// use tauri_icon_generator::icon_generator::{GeneratorConfig, IconGenerator};
    ///
    /// let generator = IconGenerator::new(GeneratorConfig::default());
    /// assert!(!generator.has_source());
    /// ```
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config: RwLock::new(config),
            source: RwLock::new(None),
            renderer: None,
            generating: AtomicBool::new(false),
            progress: AtomicU8::new(0),
            state: AtomicU8::new(GenerationState::Idle.as_u8()),
            cancel_requested: AtomicBool::new(false),
        }
    }

    /// 使用自定义渲染器创建生成器。
    pub fn with_renderer(config: GeneratorConfig, renderer: Arc<dyn AssetRenderer>) -> Self {
        Self {
            renderer: Some(renderer),
            ..Self::new(config)
        }
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次生成使用一致参数。
    pub fn config_snapshot(&self) -> Result<GeneratorConfig, IconError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| IconError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    pub fn set_quality(&self, quality: u8) -> Result<(), IconError> {
        let quality = validate_quality(quality)?;
        let mut config = self
            .config
            .write()
            .map_err(|_| IconError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.quality = quality;

        log::info!("⚙️ 输出质量已设置为 {}", quality);
        Ok(())
    }

    pub fn quality(&self) -> Result<u8, IconError> {
        Ok(self.config_snapshot()?.quality)
    }

    pub fn set_resize_filter(&self, filter: FilterType) -> Result<(), IconError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| IconError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.resize_filter = filter;

        log::info!("⚙️ 缩放滤镜已设置为 {}", resize_filter_name(filter));
        Ok(())
    }

    /// 替换当前源图。
    pub fn set_source(&self, source: SourceImage) -> Result<SourceSummary, IconError> {
        let summary = source.summary();
        let mut guard = self
            .source
            .write()
            .map_err(|_| IconError::ResourceLimit("源图写入锁已中毒".to_string()))?;
        *guard = Some(Arc::new(source));
        Ok(summary)
    }

    pub fn clear_source(&self) -> Result<(), IconError> {
        let mut guard = self
            .source
            .write()
            .map_err(|_| IconError::ResourceLimit("源图写入锁已中毒".to_string()))?;
        *guard = None;
        Ok(())
    }

    pub fn has_source(&self) -> bool {
        self.current_source().map(|s| s.is_some()).unwrap_or(false)
    }

    pub fn source_summary(&self) -> Result<Option<SourceSummary>, IconError> {
        Ok(self.current_source()?.map(|source| source.summary()))
    }

    fn current_source(&self) -> Result<Option<Arc<SourceImage>>, IconError> {
        self.source
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| IconError::ResourceLimit("源图读取锁已中毒".to_string()))
    }

    /// 解码字节并设为当前源图。
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<SourceSummary, IconError> {
        let config = self.config_snapshot()?;
        self.set_source(loader::load_image(bytes, &config)?)
    }

    /// 读取第一个文件并设为当前源图。
    pub fn load_files<P: AsRef<std::path::Path>>(&self, paths: &[P]) -> Result<SourceSummary, IconError> {
        let config = self.config_snapshot()?;
        self.set_source(loader::load_first_image_file(paths, &config)?)
    }

    /// 解析 Base64 / Data URL 并设为当前源图。
    pub fn load_base64(&self, data: &str) -> Result<SourceSummary, IconError> {
        let config = self.config_snapshot()?;
        self.set_source(loader::load_image_base64(data, &config)?)
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    /// 当前进度百分比（空闲时为 0）。
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Acquire)
    }

    pub fn state(&self) -> GenerationState {
        GenerationState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// 请求取消进行中的生成；没有进行中的生成时返回 `false`。
    pub fn cancel(&self) -> bool {
        if !self.is_generating() {
            return false;
        }
        self.cancel_requested.store(true, Ordering::Release);
        log::info!("🛑 已请求取消图标生成");
        true
    }

    /// 同步执行一次完整生成。
    ///
    /// `on_progress` 在每个条目完成后以及终态时被调用。
    ///
    /// # 示例
    /// ```rust
    /// use tauri_icon_generator::icon_generator::{GeneratorConfig, IconGenerator, SourceImage};
    ///
    /// let generator = IconGenerator::new(GeneratorConfig::default());
    /// generator.set_source(SourceImage::from(image::RgbaImage::from_pixel(
    ///     64, 64, image::Rgba([255, 0, 0, 255]),
    /// )))?;
    /// let archive = generator.generate(|update| println!("{}%", update.percent))?;
    /// assert_eq!(archive.file_name, "tauri-icons.zip");
    /// # Ok::<(), tauri_icon_generator::icon_generator::IconError>(())
    /// ```
    pub fn generate<F>(&self, mut on_progress: F) -> Result<GeneratedArchive, IconError>
    where
        F: FnMut(&ProgressUpdate),
    {
        let source = self.current_source()?.ok_or(IconError::NoImage)?;

        if self
            .generating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(IconError::Busy);
        }
        let _guard = RunGuard { generator: self };

        self.progress.store(0, Ordering::Release);
        self.state
            .store(GenerationState::Running.as_u8(), Ordering::Release);

        let config = self.config_snapshot()?;
        let default_renderer;
        let renderer: &dyn AssetRenderer = match &self.renderer {
            Some(renderer) => renderer.as_ref(),
            None => {
                default_renderer = PngRenderer::new(config.resize_filter);
                &default_renderer
            }
        };

        log::info!(
            "🚀 开始生成图标 - 源图: {}x{} 条目: {} 质量: {} 滤镜: {}",
            source.width(),
            source.height(),
            MANIFEST.len(),
            config.quality,
            resize_filter_name(config.resize_filter)
        );

        match self.run_manifest(&source, &config, renderer, &mut on_progress) {
            Ok(archive) => {
                self.state
                    .store(GenerationState::Completed.as_u8(), Ordering::Release);
                on_progress(&ProgressUpdate {
                    state: GenerationState::Completed,
                    processed: archive.entry_count,
                    total: MANIFEST.len(),
                    percent: 100,
                    output_path: None,
                    error_code: None,
                    error_message: None,
                });
                Ok(archive)
            }
            Err(err) => {
                self.state
                    .store(GenerationState::Failed.as_u8(), Ordering::Release);
                log::error!("❌ 图标生成失败: {}", err);
                on_progress(&ProgressUpdate {
                    state: GenerationState::Failed,
                    processed: 0,
                    total: MANIFEST.len(),
                    percent: 0,
                    output_path: None,
                    error_code: Some(err.code()),
                    error_message: Some(err.to_string()),
                });
                Err(err)
            }
        }
    }

    /// 在阻塞线程池中执行生成，进度经通道发送给前台。
    ///
    /// 接收端被丢弃不会中止生成。
    pub async fn generate_in_background(
        self: &Arc<Self>,
        progress_tx: mpsc::UnboundedSender<ProgressUpdate>,
    ) -> Result<GeneratedArchive, IconError> {
        let generator = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            generator.generate(|update| {
                let _ = progress_tx.send(update.clone());
            })
        })
        .await
        .map_err(|e| IconError::Render(format!("后台生成任务异常退出：{}", e)))?
    }

    fn run_manifest<F>(
        &self,
        source: &SourceImage,
        config: &GeneratorConfig,
        renderer: &dyn AssetRenderer,
        on_progress: &mut F,
    ) -> Result<GeneratedArchive, IconError>
    where
        F: FnMut(&ProgressUpdate),
    {
        let total_start = Instant::now();
        let mut job = GenerationJob::new(MANIFEST.len(), config.quality);
        let mut archive = ArchiveBuilder::with_capacity(job.total_entries);

        for entry in MANIFEST {
            if self.cancel_requested.load(Ordering::Acquire) {
                return Err(IconError::Cancelled);
            }

            let encoded_bytes = renderer
                .render(
                    source,
                    entry.width,
                    entry.height,
                    entry.shape,
                    job.quality_percent,
                )
                .map_err(|err| match err {
                    IconError::Render(msg) => {
                        IconError::Render(format!("{}：{}", entry.output_path, msg))
                    }
                    other => other,
                })?;

            log::debug!(
                "🖼️ {} {}x{} {:?} -> {}B",
                entry.output_path,
                entry.width,
                entry.height,
                entry.shape,
                encoded_bytes.len()
            );

            archive.put(RenderedAsset {
                output_path: entry.output_path.to_string(),
                encoded_bytes,
                mime_type: PNG_MIME_TYPE,
            });

            let percent = job.advance();
            self.progress.store(percent, Ordering::Release);
            on_progress(&job.running_update(entry.output_path));
        }
        let render_elapsed = total_start.elapsed();

        let archive_start = Instant::now();
        let entry_count = archive.len();
        let bytes = archive.finalize_with_limit(config.max_archive_size)?;
        let archive_elapsed = archive_start.elapsed();

        log::info!(
            "✅ 图标生成完成 - 文件数: {} 压缩包: {}KB render={}ms archive={}ms total={}ms",
            entry_count,
            bytes.len() / 1024,
            render_elapsed.as_millis(),
            archive_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(GeneratedArchive {
            file_name: config.archive_file_name.clone(),
            bytes,
            entry_count,
        })
    }
}
