//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ThumbnailHandler` 只负责流程编排与配置管理，不绑定任何平台句柄。
//! 处理链路固定为：
//! 1. 读取配置快照
//! 2. 按来源加载文档字节
//! 3. 定位内嵌载荷
//! 4. 解码为对齐 RGB 缓冲
//! 5. 按配置缩放到请求尺寸
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<ThumbnailConfig>>` 支持运行时切换档位。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录 `load/locate/decode/fit/total` 阶段耗时，便于性能诊断。
//! - 任一阶段失败立即返回，不重试、不返回部分结果。

use std::io::Read;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use super::decoder::decode_payload;
use super::fit::fit_to_requested;
use super::locator::locate_with;
use super::source::{DecodedImage, DocumentSource, ExtractedThumbnail, RenderedThumbnail};
use super::{ThumbnailConfig, ThumbnailError, ThumbnailProfile};

/// 缩略图处理器。
///
/// 可在线程间共享；每次调用互不影响。
#[derive(Debug, Clone)]
pub struct ThumbnailHandler {
    config: Arc<RwLock<ThumbnailConfig>>,
}

impl Default for ThumbnailHandler {
    fn default() -> Self {
        Self::new(ThumbnailConfig::default())
    }
}

impl ThumbnailHandler {
    /// 根据初始配置创建处理器。
    ///
    /// # 示例
    /// ```rust
    /// use place_thumb::thumbnail::{ThumbnailConfig, ThumbnailHandler, ThumbnailProfile};
    ///
    /// let handler = ThumbnailHandler::new(ThumbnailConfig::default());
    /// handler.set_profile(ThumbnailProfile::Speed)?;
    /// assert_eq!(handler.profile()?, ThumbnailProfile::Speed);
    /// # Ok::<(), place_thumb::thumbnail::ThumbnailError>(())
    /// ```
    pub fn new(config: ThumbnailConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> Result<ThumbnailConfig, ThumbnailError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| ThumbnailError::State("配置读取锁已中毒".to_string()))
    }

    /// 设置质量档位。
    pub fn set_profile(&self, profile: ThumbnailProfile) -> Result<(), ThumbnailError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| ThumbnailError::State("配置写入锁已中毒".to_string()))?;
        config.apply_profile(profile);

        log::info!(
            "⚙️ 已切换缩略图档位：{}（filter={:?}）",
            profile,
            config.resize_filter
        );

        Ok(())
    }

    /// 获取当前生效档位。
    pub fn profile(&self) -> Result<ThumbnailProfile, ThumbnailError> {
        let config = self
            .config
            .read()
            .map_err(|_| ThumbnailError::State("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_profile())
    }

    /// 定位并解码，返回原始分辨率图像。`requested_size` 不影响解码结果。
    pub fn extract(
        &self,
        document: &[u8],
        _requested_size: u32,
    ) -> Result<ExtractedThumbnail, ThumbnailError> {
        let config = self.config_snapshot()?;
        Self::extract_with(&config, document)
    }

    /// 定位、解码并按配置缩放到请求尺寸。
    pub fn render(&self, document: &[u8], requested_size: u32) -> Result<DecodedImage, ThumbnailError> {
        let config = self.config_snapshot()?;
        let extracted = Self::extract_with(&config, document)?;
        Self::fit_with(&config, extracted.image, requested_size)
    }

    /// 处理主入口：从任意来源加载文档并生成缩略图。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use place_thumb::thumbnail::{DocumentSource, ThumbnailHandler};
    ///
    /// let handler = ThumbnailHandler::default();
    /// let thumb = handler.process(DocumentSource::FilePath("place.rbxl".into()), 256)?;
    /// println!("{}x{}", thumb.image.width(), thumb.image.height());
    /// # Ok::<(), place_thumb::thumbnail::ThumbnailError>(())
    /// ```
    pub fn process(
        &self,
        source: DocumentSource,
        requested_size: u32,
    ) -> Result<RenderedThumbnail, ThumbnailError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let load_start = Instant::now();
        let document = Self::load_document(source, &config).inspect_err(Self::log_failure)?;
        let load_elapsed = load_start.elapsed();

        let rendered = Self::render_with(&config, &document.bytes, requested_size, document.source_hint)
            .inspect_err(Self::log_failure)?;

        log::info!(
            "✅ 缩略图处理完成 - 来源: {} load={}ms total={}ms",
            document.source_hint,
            load_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(rendered)
    }

    /// 排空读取流后处理，对应宿主以流初始化的场景。
    pub fn process_reader<R: Read>(
        &self,
        reader: R,
        requested_size: u32,
    ) -> Result<RenderedThumbnail, ThumbnailError> {
        let config = self.config_snapshot()?;
        let document = Self::load_from_reader(reader, &config).inspect_err(Self::log_failure)?;
        Self::render_with(&config, &document.bytes, requested_size, document.source_hint)
            .inspect_err(Self::log_failure)
    }

    fn render_with(
        config: &ThumbnailConfig,
        document: &[u8],
        requested_size: u32,
        source_hint: &'static str,
    ) -> Result<RenderedThumbnail, ThumbnailError> {
        let extracted = Self::extract_with(config, document)?;
        let (native_width, native_height) = (extracted.image.width(), extracted.image.height());

        let fit_start = Instant::now();
        let image = Self::fit_with(config, extracted.image, requested_size)?;
        log::debug!("⏱️ fit={}ms", fit_start.elapsed().as_millis());

        log::info!(
            "🖼️ 缩略图生成成功 - 来源: {} 载荷: {} 字节 @{} 原始尺寸: {}x{} 输出尺寸: {}x{}",
            source_hint,
            extracted.payload_len,
            extracted.payload_offset,
            native_width,
            native_height,
            image.width(),
            image.height()
        );

        Ok(RenderedThumbnail {
            image,
            native_width,
            native_height,
            payload_offset: extracted.payload_offset,
            payload_len: extracted.payload_len,
            mime_type: extracted.mime_type,
            source_hint,
        })
    }

    fn extract_with(config: &ThumbnailConfig, document: &[u8]) -> Result<ExtractedThumbnail, ThumbnailError> {
        let locate_start = Instant::now();
        let payload = locate_with(document, config.marker_search)?;
        let locate_elapsed = locate_start.elapsed();

        let decode_start = Instant::now();
        let (image, mime_type) = decode_payload(payload.bytes(), config)?;
        let decode_elapsed = decode_start.elapsed();

        log::debug!(
            "⏱️ 文档 {} 字节 locate={}ms decode={}ms",
            document.len(),
            locate_elapsed.as_millis(),
            decode_elapsed.as_millis()
        );

        Ok(ExtractedThumbnail {
            image,
            payload_offset: payload.offset(),
            payload_len: payload.len(),
            mime_type,
        })
    }

    fn fit_with(
        config: &ThumbnailConfig,
        image: DecodedImage,
        requested_size: u32,
    ) -> Result<DecodedImage, ThumbnailError> {
        if !config.fit_to_requested {
            return Ok(image);
        }
        fit_to_requested(&image, requested_size, config.resize_filter)
    }

    fn log_failure(error: &ThumbnailError) {
        log::warn!(
            "⚠️ 缩略图生成失败 - stage={} code={}：{}",
            error.stage(),
            error.code(),
            error
        );
    }
}
