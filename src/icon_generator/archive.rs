//! # 打包模块
//!
//! 按清单路径收集渲染结果，`finalize` 时一次性序列化为 zip。
//! `finalize` 之前没有任何副作用。

use std::collections::HashMap;
use std::io::{self, Cursor, Seek, SeekFrom, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::source::RenderedAsset;
use super::IconError;

/// 按插入顺序保存的压缩包内容。
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    assets: Vec<RenderedAsset>,
    index: HashMap<String, usize>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            assets: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// 写入一个文件；同路径重复写入时原位覆盖，保留首次出现的顺序。
    pub fn put(&mut self, asset: RenderedAsset) {
        if let Some(&slot) = self.index.get(&asset.output_path) {
            log::warn!("⚠️ 压缩包路径重复，覆盖旧内容: {}", asset.output_path);
            self.assets[slot] = asset;
            return;
        }

        self.index.insert(asset.output_path.clone(), self.assets.len());
        self.assets.push(asset);
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|asset| asset.output_path.as_str())
    }

    pub fn get(&self, output_path: &str) -> Option<&RenderedAsset> {
        self.index.get(output_path).map(|&slot| &self.assets[slot])
    }

    /// 序列化为 zip 字节（Deflate）。
    pub fn finalize(self) -> Result<Vec<u8>, IconError> {
        self.finalize_with_limit(u64::MAX)
    }

    /// 序列化为 zip 字节，写出体积超过 `max_bytes` 时返回 `Archive` 错误。
    pub fn finalize_with_limit(self, max_bytes: u64) -> Result<Vec<u8>, IconError> {
        let mut writer = ZipWriter::new(LimitedCursor::new(max_bytes));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for asset in &self.assets {
            writer
                .start_file(asset.output_path.as_str(), options)
                .map_err(|e| {
                    IconError::Archive(format!("写入条目失败 {}：{}", asset.output_path, e))
                })?;
            writer.write_all(&asset.encoded_bytes).map_err(|e| {
                IconError::Archive(format!("写入条目数据失败 {}：{}", asset.output_path, e))
            })?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| IconError::Archive(format!("生成压缩包失败：{}", e)))?;
        Ok(cursor.inner.into_inner())
    }
}

/// 带体积上限的内存写入器。
struct LimitedCursor {
    inner: Cursor<Vec<u8>>,
    limit: u64,
}

impl LimitedCursor {
    fn new(limit: u64) -> Self {
        Self {
            inner: Cursor::new(Vec::new()),
            limit,
        }
    }
}

impl Write for LimitedCursor {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let end = self.inner.position().saturating_add(buf.len() as u64);
        if end > self.limit {
            return Err(io::Error::other(format!(
                "压缩包超过大小上限（{} 字节）",
                self.limit
            )));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Seek for LimitedCursor {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn asset(path: &str, bytes: &[u8]) -> RenderedAsset {
        RenderedAsset {
            output_path: path.to_string(),
            encoded_bytes: bytes.to_vec(),
            mime_type: "image/png",
        }
    }

    #[test]
    fn finalize_writes_entries_in_insertion_order() {
        let mut builder = ArchiveBuilder::new();
        builder.put(asset("icons/b.png", b"bbb"));
        builder.put(asset("android/mipmap-mdpi/a.png", b"a"));

        let bytes = builder.finalize().expect("finalize should succeed");
        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");

        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).expect("first").name(), "icons/b.png");
        assert_eq!(
            archive.by_index(1).expect("second").name(),
            "android/mipmap-mdpi/a.png"
        );

        let mut content = Vec::new();
        archive
            .by_name("icons/b.png")
            .expect("entry exists")
            .read_to_end(&mut content)
            .expect("read entry");
        assert_eq!(content, b"bbb");
    }

    #[test]
    fn duplicate_path_overwrites_in_place() {
        let mut builder = ArchiveBuilder::with_capacity(2);
        builder.put(asset("icons/a.png", b"old"));
        builder.put(asset("icons/b.png", b"b"));
        builder.put(asset("icons/a.png", b"new"));

        assert_eq!(builder.len(), 2);
        assert_eq!(builder.paths().collect::<Vec<_>>(), ["icons/a.png", "icons/b.png"]);
        assert_eq!(builder.get("icons/a.png").expect("exists").encoded_bytes, b"new");
    }

    #[test]
    fn empty_builder_produces_valid_empty_zip() {
        let builder = ArchiveBuilder::new();
        assert!(builder.is_empty());

        let bytes = builder.finalize().expect("finalize should succeed");
        let archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn finalize_fails_when_archive_exceeds_limit() {
        let mut builder = ArchiveBuilder::new();
        builder.put(asset("icons/icon.png", &[7u8; 4096]));

        let result = builder.finalize_with_limit(16);
        assert!(matches!(result, Err(IconError::Archive(_))));
    }

    #[test]
    fn finalize_within_limit_matches_unbounded_output() {
        let build = || {
            let mut builder = ArchiveBuilder::new();
            builder.put(asset("icons/32x32.png", b"png"));
            builder
        };

        let unbounded = build().finalize().expect("unbounded");
        let bounded = build()
            .finalize_with_limit(unbounded.len() as u64)
            .expect("limit equal to size");
        assert_eq!(bounded.len(), unbounded.len());
        let archive = ZipArchive::new(Cursor::new(bounded)).expect("valid zip");
        assert_eq!(archive.len(), 1);
    }
}
