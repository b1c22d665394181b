//! # place 文档缩略图提取 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │        宿主（CLI / 资源管理器适配层 / Web 服务）         │
//! │                                                          │
//! │   文件 / 流 ──► ThumbnailHandler ──► PNG / Data URL      │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<_, ThumbnailError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            核心（纯函数，无状态）                │
//! │                                                          │
//! │  locate(&[u8]) ── `</roblox>` + 分隔字节 → PayloadSlice  │
//! │       │                                                  │
//! │  decode(&[u8], size) ── 解码 → 4 字节对齐 RGB 缓冲       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 命令行层统一错误类型 `AppError` |
//! | [`thumbnail`] | 载荷定位、解码、加载、缩放、导出与流水线编排 |

pub mod error;
pub mod thumbnail;
