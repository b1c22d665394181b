//! # 配置模块
//!
//! ## 设计思路
//!
//! 核心算法（定位 + 解码）本身只认可安全上限，其余参数都属于外部协作层
//! （加载、缩放）。所有可调项集中在 `ThumbnailConfig`，保证行为可观测、可测试。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置。
//! - `ThumbnailProfile` 负责档位字符串解析与反向输出。
//! - `apply_profile` 将档位转换为缩放滤镜。
//! - `infer_profile` 用于从当前配置反推档位。

use std::fmt;
use std::str::FromStr;

use image::imageops::FilterType;

use super::ThumbnailError;

/// 闭合标记出现多次时选取哪一处。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerSearch {
    /// 第一处匹配（默认，单根文档语义）。
    #[default]
    First,
    /// 最后一处匹配，用于属性值中可能夹带标记文本的文档。
    Last,
}

/// 缩略图处理配置。
#[derive(Debug, Clone)]
pub struct ThumbnailConfig {
    /// 加载文档时允许的最大体积（字节）。
    pub max_document_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码输出缓冲上限（`height * stride`，字节）。
    pub max_decoded_bytes: u64,
    /// 闭合标记匹配策略。
    pub marker_search: MarkerSearch,
    /// 是否在宿主侧把原始分辨率缩放到请求尺寸。
    pub fit_to_requested: bool,
    /// 缩放滤镜。
    pub resize_filter: FilterType,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_document_size: 64 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            marker_search: MarkerSearch::First,
            fit_to_requested: true,
            resize_filter: FilterType::Triangle,
        }
    }
}

/// 缩略图质量档位。
///
/// - `Quality`：尽量保真
/// - `Balanced`：质量与性能平衡
/// - `Speed`：优先速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailProfile {
    Quality,
    Balanced,
    Speed,
}

impl ThumbnailProfile {
    /// 将档位输出为稳定字符串。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl FromStr for ThumbnailProfile {
    type Err = ThumbnailError;

    /// 从外部字符串解析档位（大小写与首尾空白不敏感）。
    ///
    /// # 示例
    /// ```rust
    /// use place_thumb::thumbnail::ThumbnailProfile;
    ///
    /// let p: ThumbnailProfile = " Speed ".parse()?;
    /// assert_eq!(p.as_str(), "speed");
    /// # Ok::<(), place_thumb::thumbnail::ThumbnailError>(())
    /// ```
    fn from_str(profile: &str) -> Result<Self, Self::Err> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(ThumbnailError::InvalidConfig(format!(
                "未知档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }
}

impl fmt::Display for ThumbnailProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ThumbnailConfig {
    /// 基于当前滤镜反推档位。
    pub fn infer_profile(&self) -> ThumbnailProfile {
        match self.resize_filter {
            FilterType::Lanczos3 | FilterType::CatmullRom => ThumbnailProfile::Quality,
            FilterType::Nearest => ThumbnailProfile::Speed,
            FilterType::Triangle | FilterType::Gaussian => ThumbnailProfile::Balanced,
        }
    }

    /// 应用指定档位到实际参数。
    pub fn apply_profile(&mut self, profile: ThumbnailProfile) {
        self.resize_filter = match profile {
            ThumbnailProfile::Quality => FilterType::Lanczos3,
            ThumbnailProfile::Balanced => FilterType::Triangle,
            ThumbnailProfile::Speed => FilterType::Nearest,
        };
    }
}
