//! # 图标清单
//!
//! 固定的输出路径 → 尺寸/形状映射，对应 Tauri 打包工具链的目录约定。
//! 顺序即生成顺序：Windows / macOS / iOS / Linux，然后按密度排列 Android。

use serde::Serialize;

/// 渲染形状。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// 整幅拉伸填充。
    Rectangle,
    /// 缩放后施加圆形透明遮罩。
    Circle,
}

/// 清单条目。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub output_path: &'static str,
    pub width: u32,
    pub height: u32,
    pub shape: Shape,
}

const fn square(output_path: &'static str, size: u32) -> ManifestEntry {
    ManifestEntry {
        output_path,
        width: size,
        height: size,
        shape: Shape::Rectangle,
    }
}

const fn round(output_path: &'static str, size: u32) -> ManifestEntry {
    ManifestEntry {
        output_path,
        width: size,
        height: size,
        shape: Shape::Circle,
    }
}

/// Android 密度档位及其基准尺寸。
pub const ANDROID_DENSITIES: [(&str, u32); 5] = [
    ("mdpi", 48),
    ("hdpi", 72),
    ("xhdpi", 96),
    ("xxhdpi", 144),
    ("xxxhdpi", 192),
];

/// 完整清单。
pub const MANIFEST: &[ManifestEntry] = &[
    // Windows
    square("icons/32x32.png", 32),
    // macOS
    square("icons/128x128.png", 128),
    square("icons/128x128@2x.png", 256),
    square("icons/32x32@2x.png", 64),
    square("icons/icon.png", 1024),
    // iOS
    square("icons/ios/16.png", 16),
    square("icons/ios/20.png", 20),
    square("icons/ios/29.png", 29),
    square("icons/ios/32.png", 32),
    square("icons/ios/40.png", 40),
    square("icons/ios/50.png", 50),
    square("icons/ios/57.png", 57),
    square("icons/ios/58.png", 58),
    square("icons/ios/60.png", 60),
    square("icons/ios/64.png", 64),
    square("icons/ios/72.png", 72),
    square("icons/ios/76.png", 76),
    square("icons/ios/80.png", 80),
    square("icons/ios/87.png", 87),
    square("icons/ios/100.png", 100),
    square("icons/ios/114.png", 114),
    square("icons/ios/120.png", 120),
    square("icons/ios/128.png", 128),
    square("icons/ios/144.png", 144),
    square("icons/ios/152.png", 152),
    square("icons/ios/167.png", 167),
    square("icons/ios/180.png", 180),
    square("icons/ios/192.png", 192),
    square("icons/ios/256.png", 256),
    square("icons/ios/512.png", 512),
    square("icons/ios/1024.png", 1024),
    // Linux
    square("icons/256x256.png", 256),
    square("icons/512x512.png", 512),
    square("icons/1024x1024.png", 1024),
    // Android：前景图与启动图同样直接由源图缩放，不做前景层提取
    square("android/mipmap-mdpi/ic_launcher.png", 48),
    square("android/mipmap-mdpi/ic_launcher_foreground.png", 48),
    round("android/mipmap-mdpi/ic_launcher_round.png", 48),
    square("android/mipmap-hdpi/ic_launcher.png", 72),
    square("android/mipmap-hdpi/ic_launcher_foreground.png", 72),
    round("android/mipmap-hdpi/ic_launcher_round.png", 72),
    square("android/mipmap-xhdpi/ic_launcher.png", 96),
    square("android/mipmap-xhdpi/ic_launcher_foreground.png", 96),
    round("android/mipmap-xhdpi/ic_launcher_round.png", 96),
    square("android/mipmap-xxhdpi/ic_launcher.png", 144),
    square("android/mipmap-xxhdpi/ic_launcher_foreground.png", 144),
    round("android/mipmap-xxhdpi/ic_launcher_round.png", 144),
    square("android/mipmap-xxxhdpi/ic_launcher.png", 192),
    square("android/mipmap-xxxhdpi/ic_launcher_foreground.png", 192),
    round("android/mipmap-xxxhdpi/ic_launcher_round.png", 192),
];

/// 按路径查找条目。
pub fn find_entry(output_path: &str) -> Option<&'static ManifestEntry> {
    MANIFEST.iter().find(|entry| entry.output_path == output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn manifest_has_expected_entry_count() {
        let android = MANIFEST
            .iter()
            .filter(|entry| entry.output_path.starts_with("android/"))
            .count();
        assert_eq!(MANIFEST.len(), 49);
        assert_eq!(android, ANDROID_DENSITIES.len() * 3);
    }

    #[test]
    fn output_paths_are_unique_and_relative() {
        let mut seen = HashSet::new();
        for entry in MANIFEST {
            assert!(seen.insert(entry.output_path), "duplicate: {}", entry.output_path);
            assert!(!entry.output_path.starts_with('/'));
            assert!(!entry.output_path.contains('\\'));
            assert!(entry.output_path.ends_with(".png"));
        }
    }

    #[test]
    fn dimensions_are_positive_and_circles_are_square() {
        for entry in MANIFEST {
            assert!(entry.width > 0 && entry.height > 0);
            if entry.shape == Shape::Circle {
                assert_eq!(entry.width, entry.height, "{}", entry.output_path);
            }
        }
    }

    #[test]
    fn android_entries_follow_density_table() {
        let android: Vec<_> = MANIFEST
            .iter()
            .filter(|entry| entry.output_path.starts_with("android/"))
            .collect();

        for (chunk, (density, size)) in android.chunks(3).zip(ANDROID_DENSITIES) {
            let dir = format!("android/mipmap-{}", density);
            assert_eq!(chunk[0].output_path, format!("{}/ic_launcher.png", dir));
            assert_eq!(chunk[1].output_path, format!("{}/ic_launcher_foreground.png", dir));
            assert_eq!(chunk[2].output_path, format!("{}/ic_launcher_round.png", dir));
            assert_eq!(chunk[0].shape, Shape::Rectangle);
            assert_eq!(chunk[1].shape, Shape::Rectangle);
            assert_eq!(chunk[2].shape, Shape::Circle);
            assert!(chunk.iter().all(|entry| entry.width == size));
        }
    }

    #[test]
    fn ios_entry_names_match_their_size() {
        for entry in MANIFEST.iter().filter(|e| e.output_path.starts_with("icons/ios/")) {
            let stem = entry
                .output_path
                .trim_start_matches("icons/ios/")
                .trim_end_matches(".png");
            assert_eq!(stem.parse::<u32>().expect("numeric stem"), entry.width);
        }
    }

    #[test]
    fn find_entry_returns_declared_size() {
        let entry = find_entry("icons/128x128@2x.png").expect("entry exists");
        assert_eq!((entry.width, entry.height), (256, 256));
        assert!(find_entry("icons/missing.png").is_none());
    }
}
