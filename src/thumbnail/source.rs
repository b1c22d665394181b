//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `DocumentSource` 表示外部来源语义
//! - `PlaceDocument` 表示已加载、未解析的文档字节
//! - `PayloadSlice` 是文档内嵌图片字节的借用视图，生命周期受文档约束
//! - `DecodedImage` 是按 4 字节对齐行宽打包的 RGB 像素

use std::path::PathBuf;

/// 文档输入来源。
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// 本地文件路径来源。
    FilePath(PathBuf),
    /// 调用方已读入内存的字节。
    Bytes(Vec<u8>),
}

/// 加载阶段输出：原始文档字节与来源标识。
#[derive(Debug, Clone)]
pub struct PlaceDocument {
    /// 原始文档字节。
    pub bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub source_hint: &'static str,
}

/// 文档内嵌图片载荷的零拷贝视图。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadSlice<'a> {
    offset: usize,
    bytes: &'a [u8],
}

impl<'a> PayloadSlice<'a> {
    pub(crate) fn new(offset: usize, bytes: &'a [u8]) -> Self {
        Self { offset, bytes }
    }

    /// 载荷在文档中的起始偏移。
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// 载荷字节，借用自原始文档。
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

/// 解码结果：自上而下、行宽按 4 字节对齐的 24 位 RGB 像素。
///
/// 构造后不可修改，填充字节恒为 0。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl DecodedImage {
    /// 调用方保证 `data.len() == height * stride`。
    pub(crate) fn from_packed(width: u32, height: u32, stride: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), height as usize * stride);
        Self {
            width,
            height,
            stride,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 每行字节数（含填充）。
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// 按行迭代，每行只包含有效像素（不含填充）。
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let row_len = self.width as usize * 3;
        self.data
            .chunks_exact(self.stride)
            .map(move |row| &row[..row_len])
    }
}

/// 编排层输出：解码结果加上载荷诊断信息。
#[derive(Debug, Clone)]
pub struct ExtractedThumbnail {
    pub image: DecodedImage,
    /// 载荷在文档中的偏移。
    pub payload_offset: usize,
    /// 载荷字节数。
    pub payload_len: usize,
    /// 签名探测到的 MIME 类型（无法识别时为 `None`）。
    pub mime_type: Option<&'static str>,
}

/// 完整流水线输出：宿主侧缩放后的图像与原始尺寸等诊断信息。
#[derive(Debug, Clone)]
pub struct RenderedThumbnail {
    /// 缩放后（或未缩放）的图像。
    pub image: DecodedImage,
    /// 解码得到的原始宽度。
    pub native_width: u32,
    /// 解码得到的原始高度。
    pub native_height: u32,
    pub payload_offset: usize,
    pub payload_len: usize,
    pub mime_type: Option<&'static str>,
    /// 文档来源提示。
    pub source_hint: &'static str,
}
