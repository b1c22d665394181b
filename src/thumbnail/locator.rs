//! # 载荷定位模块
//!
//! 文档的文本部分以 `</roblox>` 闭合，随后是一个分隔字节（约定为 `0x00`），
//! 再之后直到文档末尾都是内嵌的压缩图片。
//!
//! 定位是纯函数：不分配、不记录日志，只返回借用自输入的切片视图。

use super::source::PayloadSlice;
use super::{LocateError, MarkerSearch};

/// 容器文本部分的闭合标记。
pub const MARKER: &[u8] = b"</roblox>";

/// 紧跟在标记之后、需要跳过的分隔字节数。
pub const SEPARATOR_LEN: usize = 1;

/// 按默认策略（第一处匹配）定位内嵌图片载荷。
///
/// # 示例
/// ```rust
/// use place_thumb::thumbnail::locate;
///
/// let doc = b"<roblox></roblox>\0\xFF\xD8";
/// let payload = locate(doc)?;
/// assert_eq!(payload.bytes(), b"\xFF\xD8");
/// # Ok::<(), place_thumb::thumbnail::LocateError>(())
/// ```
pub fn locate(document: &[u8]) -> Result<PayloadSlice<'_>, LocateError> {
    locate_with(document, MarkerSearch::First)
}

/// 按指定匹配策略定位内嵌图片载荷。
pub fn locate_with(document: &[u8], search: MarkerSearch) -> Result<PayloadSlice<'_>, LocateError> {
    let marker_offset = match search {
        MarkerSearch::First => find_first(document),
        MarkerSearch::Last => find_last(document),
    }
    .ok_or(LocateError::MarkerNotFound)?;

    let start = marker_offset
        .checked_add(MARKER.len() + SEPARATOR_LEN)
        .filter(|&start| start < document.len())
        .ok_or(LocateError::NoPayload { marker_offset })?;

    Ok(PayloadSlice::new(start, &document[start..]))
}

fn find_first(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(MARKER.len())
        .position(|window| window == MARKER)
}

fn find_last(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(MARKER.len())
        .rposition(|window| window == MARKER)
}
