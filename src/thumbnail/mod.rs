//! # 缩略图模块（thumbnail）
//!
//! ## 设计思路
//!
//! 该模块将“文档加载 → 载荷定位 → 图片解码 → 宿主侧缩放 → 导出”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `locator`：在文档中查找闭合标记，返回内嵌图片的零拷贝视图
//! - `decoder`：解码载荷，输出 4 字节对齐行宽的 RGB 缓冲
//! - `loader`：文件 / 任意 `Read` → 内存文档（含体积上限）
//! - `fit`：宿主侧把原始分辨率缩放到请求尺寸
//! - `export`：PNG / Data URL 编码
//! - `handler`：编排整条处理流水线
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 实现思路
//!
//! `locator` 与 `decoder` 是无状态纯函数：不记录日志、不重试、不缓存，
//! 失败一律以类型化错误返回。日志、计时与配置快照只出现在外层编排中。
//!
//! ## 新同事快速上手
//!
//! ```text
//! 宿主（CLI / 平台适配层）
//!    ↓
//! handler.rs（配置快照 + 阶段耗时日志）
//!    ├─ loader.rs（文件/流读取 + 体积校验）
//!    ├─ locator.rs（`</roblox>` + 分隔字节 → PayloadSlice）
//!    ├─ decoder.rs（签名探测 + 尺寸上限 + 解码 + 行对齐）
//!    └─ fit.rs（按请求尺寸降采样，可关闭）
//!    ↓
//! DecodedImage → export.rs（PNG / Data URL）
//! ```

mod config;
mod decoder;
mod error;
mod export;
mod fit;
mod handler;
mod loader;
mod locator;
mod source;

pub use config::{MarkerSearch, ThumbnailConfig, ThumbnailProfile};
pub use decoder::{decode, decode_with_config, row_stride};
pub use error::{DecodeError, LocateError, ThumbnailError};
pub use export::{encode_png, to_png_data_url, to_rgb_image};
pub use fit::fit_to_requested;
pub use handler::ThumbnailHandler;
pub use locator::{MARKER, SEPARATOR_LEN, locate, locate_with};
pub use source::{
    DecodedImage, DocumentSource, ExtractedThumbnail, PayloadSlice, PlaceDocument,
    RenderedThumbnail,
};
