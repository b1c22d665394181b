//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 核心算法只接受已完整读入内存的文档。本模块负责把不同来源（本地文件 / 任意 `Read` /
//! 调用方字节）变成 `PlaceDocument`，并在“尽可能早”的阶段执行体积校验。
//!
//! ## 实现思路
//!
//! - 文件：存在性 + metadata 体积限制 + 分块读取。
//! - 流：按 4096 字节分块排空，累计超限立即失败，`Interrupted` 自动重试。
//! - 空文档照常返回，由定位阶段给出 `MarkerNotFound`。

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::source::{DocumentSource, PlaceDocument};
use super::{ThumbnailConfig, ThumbnailError, ThumbnailHandler};

const READ_CHUNK_BYTES: usize = 4096;

impl ThumbnailHandler {
    /// 按来源加载文档。
    pub(super) fn load_document(
        source: DocumentSource,
        config: &ThumbnailConfig,
    ) -> Result<PlaceDocument, ThumbnailError> {
        match source {
            DocumentSource::FilePath(path) => Self::load_from_file(&path, config),
            DocumentSource::Bytes(bytes) => {
                Self::validate_document_size(bytes.len() as u64, config)?;
                Ok(PlaceDocument {
                    bytes,
                    source_hint: "bytes",
                })
            }
        }
    }

    /// 从本地文件加载文档。
    pub(super) fn load_from_file(
        path: &Path,
        config: &ThumbnailConfig,
    ) -> Result<PlaceDocument, ThumbnailError> {
        log::info!("📁 开始读取文档 - 路径: {}", path.display());

        if !path.exists() {
            return Err(ThumbnailError::FileSystem(format!(
                "文件不存在：{}",
                path.display()
            )));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| ThumbnailError::FileSystem(format!("无法读取文件信息：{}", e)))?;
        if !metadata.is_file() {
            return Err(ThumbnailError::FileSystem(format!(
                "不是普通文件：{}",
                path.display()
            )));
        }
        Self::validate_document_size(metadata.len(), config)?;

        let file = File::open(path)
            .map_err(|e| ThumbnailError::FileSystem(format!("无法打开文档：{}", e)))?;
        let bytes = Self::drain_reader(file, config)?;

        Ok(PlaceDocument {
            bytes,
            source_hint: "file",
        })
    }

    /// 排空任意读取流。
    pub(super) fn load_from_reader<R: Read>(
        reader: R,
        config: &ThumbnailConfig,
    ) -> Result<PlaceDocument, ThumbnailError> {
        let bytes = Self::drain_reader(reader, config)?;
        Ok(PlaceDocument {
            bytes,
            source_hint: "reader",
        })
    }

    fn drain_reader<R: Read>(mut reader: R, config: &ThumbnailConfig) -> Result<Vec<u8>, ThumbnailError> {
        let mut bytes = Vec::new();
        let mut chunk = [0u8; READ_CHUNK_BYTES];

        loop {
            let read = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(read) => read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ThumbnailError::FileSystem(format!("读取文档失败：{}", e)));
                }
            };

            Self::validate_document_size((bytes.len() + read) as u64, config)?;
            bytes.extend_from_slice(&chunk[..read]);
        }

        Ok(bytes)
    }

    fn validate_document_size(len: u64, config: &ThumbnailConfig) -> Result<(), ThumbnailError> {
        if len > config.max_document_size {
            return Err(ThumbnailError::ResourceLimit(format!(
                "文档过大：{:.2} MB（限制：{:.2} MB）",
                len as f64 / 1024.0 / 1024.0,
                config.max_document_size as f64 / 1024.0 / 1024.0
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::time::{SystemTime, UNIX_EPOCH};

    /// 每次最多返回 `step` 字节，并穿插一次 `Interrupted`。
    struct TrickleReader {
        inner: Cursor<Vec<u8>>,
        step: usize,
        interrupted: bool,
    }

    impl Read for TrickleReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let len = buf.len().min(self.step);
            self.inner.read(&mut buf[..len])
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stream reset"))
        }
    }

    fn unique_temp_path(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("{}_{}.rbxl", prefix, nanos))
    }

    #[test]
    fn reader_is_drained_across_short_reads() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let reader = TrickleReader {
            inner: Cursor::new(data.clone()),
            step: 777,
            interrupted: false,
        };

        let doc = ThumbnailHandler::load_from_reader(reader, &ThumbnailConfig::default())
            .expect("reader should drain");

        assert_eq!(doc.bytes, data);
        assert_eq!(doc.source_hint, "reader");
    }

    #[test]
    fn reader_over_limit_is_rejected() {
        let config = ThumbnailConfig {
            max_document_size: 5_000,
            ..ThumbnailConfig::default()
        };

        let result = ThumbnailHandler::load_from_reader(Cursor::new(vec![0u8; 5_001]), &config);
        assert!(matches!(result, Err(ThumbnailError::ResourceLimit(_))));
    }

    #[test]
    fn reader_errors_map_to_file_system() {
        let result = ThumbnailHandler::load_from_reader(FailingReader, &ThumbnailConfig::default());
        assert!(matches!(result, Err(ThumbnailError::FileSystem(_))));
    }

    #[test]
    fn empty_reader_yields_empty_document() {
        let doc = ThumbnailHandler::load_from_reader(io::empty(), &ThumbnailConfig::default())
            .expect("empty reader should load");
        assert!(doc.bytes.is_empty());
    }

    #[test]
    fn missing_file_is_reported() {
        let path = unique_temp_path("place_thumb_missing");
        let result = ThumbnailHandler::load_from_file(&path, &ThumbnailConfig::default());
        assert!(matches!(result, Err(ThumbnailError::FileSystem(_))));
    }

    #[test]
    fn file_is_loaded_and_size_checked() {
        let path = unique_temp_path("place_thumb_load");
        std::fs::write(&path, b"<roblox></roblox>\0abc").expect("write temp file failed");

        let doc = ThumbnailHandler::load_from_file(&path, &ThumbnailConfig::default())
            .expect("file should load");
        assert_eq!(doc.bytes, b"<roblox></roblox>\0abc");
        assert_eq!(doc.source_hint, "file");

        let tight = ThumbnailConfig {
            max_document_size: 4,
            ..ThumbnailConfig::default()
        };
        let result = ThumbnailHandler::load_from_file(&path, &tight);
        assert!(matches!(result, Err(ThumbnailError::ResourceLimit(_))));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn byte_source_respects_limit() {
        let config = ThumbnailConfig {
            max_document_size: 2,
            ..ThumbnailConfig::default()
        };

        let result = ThumbnailHandler::load_document(DocumentSource::Bytes(vec![1, 2, 3]), &config);
        assert!(matches!(result, Err(ThumbnailError::ResourceLimit(_))));
    }
}
