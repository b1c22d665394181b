//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 按流水线阶段拆分错误：
//! - `LocateError`：定位阶段（标记查找、载荷边界）
//! - `DecodeError`：解码阶段（格式识别、尺寸校验、像素解码）
//! - `ThumbnailError`：外层编排错误，聚合前两者并补充加载/缩放/导出等外部协作者错误
//!
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//! `code()` / `stage()` 输出稳定标识，供宿主层做诊断与埋点。

/// 载荷定位错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocateError {
    /// 文档中不存在闭合标记，不是预期的容器格式。
    #[error("未找到闭合标记 `</roblox>`")]
    MarkerNotFound,

    /// 找到了标记，但标记与分隔字节之后没有任何数据。
    #[error("闭合标记（偏移 {marker_offset}）之后没有图片数据")]
    NoPayload { marker_offset: usize },
}

/// 缩略图解码错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("图片载荷为空")]
    EmptyPayload,

    #[error("不支持或已损坏的图片格式：{0}")]
    UnsupportedOrCorruptFormat(String),

    #[error("图片尺寸无效：{0}")]
    InvalidDimensions(String),

    #[error("图片解码失败：{0}")]
    DecodeFailed(String),
}

/// 缩略图流水线统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("定位错误：{0}")]
    Locate(#[from] LocateError),

    #[error("解码错误：{0}")]
    Decode(#[from] DecodeError),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("缩放错误：{0}")]
    Resize(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("配置错误：{0}")]
    InvalidConfig(String),

    #[error("状态错误：{0}")]
    State(String),
}

impl ThumbnailError {
    /// 稳定错误码，不随错误文案变化。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Locate(LocateError::MarkerNotFound) => "marker_not_found",
            Self::Locate(LocateError::NoPayload { .. }) => "no_payload",
            Self::Decode(DecodeError::EmptyPayload) => "empty_payload",
            Self::Decode(DecodeError::UnsupportedOrCorruptFormat(_)) => "unsupported_format",
            Self::Decode(DecodeError::InvalidDimensions(_)) => "invalid_dimensions",
            Self::Decode(DecodeError::DecodeFailed(_)) => "decode_failed",
            Self::FileSystem(_) => "file_system",
            Self::ResourceLimit(_) => "resource_limit",
            Self::Resize(_) => "resize_failed",
            Self::Encode(_) => "encode_failed",
            Self::InvalidConfig(_) => "invalid_config",
            Self::State(_) => "state",
        }
    }

    /// 出错的流水线阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::FileSystem(_) | Self::ResourceLimit(_) => "load",
            Self::Locate(_) => "locate",
            Self::Decode(_) => "decode",
            Self::Resize(_) => "fit",
            Self::Encode(_) => "export",
            Self::InvalidConfig(_) | Self::State(_) => "config",
        }
    }
}
