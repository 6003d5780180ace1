// 端到端：真实渲染器 + 完整清单 + zip 产物
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use tauri_icon_generator::icon_generator::{
    AssetRenderer, GenerationState, GeneratorConfig, IconError, IconGenerator, PngRenderer,
    Shape, SourceImage, MANIFEST,
};

fn create_png_bytes(width: u32, height: u32, pixel: impl Fn(u32, u32) -> Rgba<u8>) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, pixel);
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("failed to encode test image");
    cursor.into_inner()
}

fn gradient_png(size: u32) -> Vec<u8> {
    create_png_bytes(size, size, |x, y| {
        Rgba([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8, 255])
    })
}

fn read_archive(bytes: &[u8]) -> HashMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip archive");
    let mut entries = HashMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).expect("zip entry");
        let mut content = Vec::new();
        file.read_to_end(&mut content).expect("read zip entry");
        entries.insert(file.name().to_string(), content);
    }
    entries
}

fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png)
        .expect("entry should decode as image")
        .to_rgba8()
}

fn generator_with(png: &[u8], quality: u8) -> IconGenerator {
    let generator = IconGenerator::new(GeneratorConfig::default());
    generator.load_bytes(png).expect("source should load");
    generator.set_quality(quality).expect("quality should be valid");
    generator
}

#[test]
fn archive_matches_manifest_and_declared_sizes() {
    let generator = generator_with(&gradient_png(256), 90);
    let archive = generator.generate(|_| {}).expect("generation should succeed");
    let entries = read_archive(&archive.bytes);

    let expected: HashSet<&str> = MANIFEST.iter().map(|e| e.output_path).collect();
    let actual: HashSet<&str> = entries.keys().map(String::as_str).collect();
    assert_eq!(actual, expected);
    assert_eq!(entries.len(), 49);
    assert_eq!(archive.entry_count, 49);
    assert_eq!(archive.file_name, "tauri-icons.zip");

    for entry in MANIFEST {
        let decoded = decode(&entries[entry.output_path]);
        assert_eq!(
            decoded.dimensions(),
            (entry.width, entry.height),
            "{}",
            entry.output_path
        );

        if entry.shape == Shape::Circle {
            let last = entry.width - 1;
            for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
                assert_eq!(decoded.get_pixel(x, y)[3], 0, "{} corner", entry.output_path);
            }
            let center = decoded.get_pixel(entry.width / 2, entry.height / 2);
            assert_eq!(center[3], 255, "{} center", entry.output_path);
        }
    }
}

#[test]
fn progress_is_monotonic_and_reaches_hundred() {
    let generator = generator_with(&gradient_png(128), 90);

    let mut percents = Vec::new();
    let mut states = Vec::new();
    generator
        .generate(|update| {
            states.push(update.state);
            if update.state == GenerationState::Running {
                percents.push(update.percent);
                assert!(generator_progress_is_sane(update.percent));
            }
        })
        .expect("generation should succeed");

    assert_eq!(percents.len(), MANIFEST.len());
    assert!(percents[0] > 0);
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(percents.last().copied(), Some(100));
    assert_eq!(states.last().copied(), Some(GenerationState::Completed));

    assert_eq!(generator.progress(), 0);
    assert_eq!(generator.state(), GenerationState::Idle);
    assert!(!generator.is_generating());
}

fn generator_progress_is_sane(percent: u8) -> bool {
    percent <= 100
}

#[test]
fn repeated_runs_are_pixel_identical() {
    let generator = generator_with(&gradient_png(300), 80);

    let first = read_archive(&generator.generate(|_| {}).expect("first run").bytes);
    let second = read_archive(&generator.generate(|_| {}).expect("second run").bytes);

    for entry in MANIFEST {
        let a = decode(&first[entry.output_path]);
        let b = decode(&second[entry.output_path]);
        assert_eq!(a.as_raw(), b.as_raw(), "{}", entry.output_path);
    }
}

#[test]
fn solid_red_source_scenario() {
    let red = create_png_bytes(1024, 1024, |_, _| Rgba([255, 0, 0, 255]));
    let generator = generator_with(&red, 90);
    let entries = read_archive(&generator.generate(|_| {}).expect("generation").bytes);

    let windows = decode(&entries["icons/32x32.png"]);
    assert_eq!(windows.dimensions(), (32, 32));
    assert!(windows.pixels().all(|p| p.0 == [255, 0, 0, 255]));

    let round = decode(&entries["android/mipmap-mdpi/ic_launcher_round.png"]);
    assert_eq!(round.dimensions(), (48, 48));
    for (x, y) in [(0, 0), (47, 0), (0, 47), (47, 47)] {
        assert_eq!(round.get_pixel(x, y)[3], 0);
    }
    assert_eq!(round.get_pixel(24, 24).0, [255, 0, 0, 255]);
}

#[test]
fn svg_source_produces_full_icon_set() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="48" height="48"><rect width="48" height="48" fill="#ff0000"/></svg>"##;
    let generator = IconGenerator::new(GeneratorConfig::default());
    let summary = generator.load_bytes(svg).expect("svg should load");
    assert_eq!((summary.width, summary.height), (1024, 1024));

    let entries = read_archive(&generator.generate(|_| {}).expect("generation").bytes);
    assert_eq!(entries.len(), MANIFEST.len());

    let large = decode(&entries["icons/icon.png"]);
    assert_eq!(large.dimensions(), (1024, 1024));
    assert_eq!(large.get_pixel(512, 512).0, [255, 0, 0, 255]);

    let round = decode(&entries["android/mipmap-xxxhdpi/ic_launcher_round.png"]);
    assert_eq!(round.get_pixel(0, 0)[3], 0);
    assert_eq!(round.get_pixel(96, 96).0, [255, 0, 0, 255]);
}

#[test]
fn quality_extremes_produce_identical_pixels() {
    let png = gradient_png(200);
    let low = read_archive(&generator_with(&png, 1).generate(|_| {}).expect("q1").bytes);
    let high = read_archive(&generator_with(&png, 100).generate(|_| {}).expect("q100").bytes);

    for entry in MANIFEST {
        let a = decode(&low[entry.output_path]);
        let b = decode(&high[entry.output_path]);
        assert_eq!(a.dimensions(), b.dimensions());
        assert_eq!(a.as_raw(), b.as_raw(), "{}", entry.output_path);
    }
}

#[test]
fn android_foreground_matches_launcher() {
    let generator = generator_with(&gradient_png(256), 90);
    let entries = read_archive(&generator.generate(|_| {}).expect("generation").bytes);

    for density in ["mdpi", "hdpi", "xhdpi", "xxhdpi", "xxxhdpi"] {
        let launcher = decode(&entries[&format!("android/mipmap-{density}/ic_launcher.png")]);
        let foreground =
            decode(&entries[&format!("android/mipmap-{density}/ic_launcher_foreground.png")]);
        assert_eq!(launcher.as_raw(), foreground.as_raw(), "{density}");
    }
}

/// 在第 k 个条目注入失败，其余委托给真实渲染器。
struct FailAt {
    k: usize,
    calls: AtomicUsize,
    inner: PngRenderer,
}

impl AssetRenderer for FailAt {
    fn render(
        &self,
        source: &SourceImage,
        width: u32,
        height: u32,
        shape: Shape,
        quality: u8,
    ) -> Result<Vec<u8>, IconError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == self.k {
            return Err(IconError::Render("injected failure".to_string()));
        }
        self.inner.render(source, width, height, shape, quality)
    }
}

#[test]
fn failure_on_entry_k_emits_nothing_and_resets() {
    for k in [0, 17, MANIFEST.len() - 1] {
        let renderer = Arc::new(FailAt {
            k,
            calls: AtomicUsize::new(0),
            inner: PngRenderer::default(),
        });
        let generator = IconGenerator::with_renderer(GeneratorConfig::default(), renderer);
        generator.load_bytes(&gradient_png(64)).expect("source should load");

        let mut last_state = None;
        let result = generator.generate(|update| last_state = Some(update.state));

        assert!(matches!(result, Err(IconError::Render(_))), "k={k}");
        assert_eq!(last_state, Some(GenerationState::Failed));
        assert_eq!(generator.state(), GenerationState::Idle);
        assert_eq!(generator.progress(), 0);
        assert!(!generator.is_generating());
    }
}

#[test]
fn undecodable_source_never_starts_a_run() {
    let generator = IconGenerator::new(GeneratorConfig::default());

    let result = generator.load_bytes(b"\x89PNG\r\n\x1a\nbroken");
    assert!(matches!(result, Err(IconError::Decode(_))));
    assert!(matches!(generator.generate(|_| {}), Err(IconError::NoImage)));
    assert_eq!(generator.state(), GenerationState::Idle);
}

#[tokio::test]
async fn background_run_saves_archive_to_disk() {
    let generator = Arc::new(generator_with(&gradient_png(96), 90));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let archive = generator
        .generate_in_background(tx)
        .await
        .expect("background generation");

    let mut received = 0;
    while rx.recv().await.is_some() {
        received += 1;
    }
    assert_eq!(received, MANIFEST.len() + 1);

    let dir = std::env::temp_dir().join(format!("icongen-it-{}", std::process::id()));
    let path = archive.save_to_dir(&dir).expect("save archive");
    assert!(path.ends_with("tauri-icons.zip"));

    let saved = std::fs::read(&path).expect("read saved archive");
    assert_eq!(read_archive(&saved).len(), MANIFEST.len());
    let _ = std::fs::remove_dir_all(&dir);
}
