//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 缩略图流水线内部使用 `ThumbnailError`；命令行入口还会遇到参数错误与输出文件 I/O，
//! 因此在 crate 顶层定义 `AppError` 统一承载，避免 `main` 里散落 `format!` 与 `expect()`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `ThumbnailError` / `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize`，`--json` 模式下错误同样输出结构化信息。

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::thumbnail::ThumbnailError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 缩略图流水线错误（加载 / 定位 / 解码 / 缩放 / 导出）
    #[error("{0}")]
    Thumbnail(#[from] ThumbnailError),

    /// 输出文件 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 命令行参数错误
    #[error("参数错误: {0}")]
    Usage(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Thumbnail(error) => error.code(),
            Self::Io(_) => "io",
            Self::Usage(_) => "usage",
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::Thumbnail(error) => error.stage(),
            Self::Io(_) => "output",
            Self::Usage(_) => "args",
        }
    }

    /// 进程退出码：参数错误 2，其余失败 1。
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            _ => 1,
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AppError", 3)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("stage", self.stage())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
