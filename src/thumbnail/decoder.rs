//! # 解码模块
//!
//! ## 设计思路
//!
//! 将“载荷字节 → 图像 → 对齐 RGB 缓冲”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做签名探测与头部尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 空载荷直接拒绝
//! 2. 签名探测（`infer`）+ 格式猜测（`image`），读取 header 尺寸
//! 3. 按像素/字节上限快速拒绝
//! 4. JPEG 先按段结构走一遍码流：缺少 EOI、熵编码段内出现非法标记或 RST 序号错乱都视为解码失败
//!    （`image` 的 JPEG 解码对截断数据是宽容的，会补齐缺失扫描行并返回成功）
//! 5. 带 `Limits` 的完整解码
//! 6. 转 RGB8，逐行拷贝到 4 字节对齐的缓冲
//!
//! `requested_size` 只是宿主层的提示，这里始终返回原始分辨率。

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader, Limits, RgbImage};

use super::source::DecodedImage;
use super::{DecodeError, ThumbnailConfig};

/// 计算 24 位 RGB 行宽（按 4 字节对齐）。溢出时返回 `None`。
///
/// ```rust
/// use place_thumb::thumbnail::row_stride;
///
/// assert_eq!(row_stride(1), Some(4));
/// assert_eq!(row_stride(4), Some(12));
/// assert_eq!(row_stride(5), Some(16));
/// ```
pub fn row_stride(width: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(3)?
        .checked_add(3)
        .map(|bytes| bytes & !3)
}

/// 使用默认安全上限解码。
pub fn decode(payload: &[u8], requested_size: u32) -> Result<DecodedImage, DecodeError> {
    decode_with_config(payload, requested_size, &ThumbnailConfig::default())
}

/// 使用指定配置中的安全上限解码。
pub fn decode_with_config(
    payload: &[u8],
    _requested_size: u32,
    config: &ThumbnailConfig,
) -> Result<DecodedImage, DecodeError> {
    decode_payload(payload, config).map(|(image, _)| image)
}

/// 解码并一并返回签名探测得到的 MIME 类型（非图片或无法识别时为 `None`）。
pub(crate) fn decode_payload(
    payload: &[u8],
    config: &ThumbnailConfig,
) -> Result<(DecodedImage, Option<&'static str>), DecodeError> {
    if payload.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }

    let (format, mime_type) = sniff_format(payload)?;
    let (width, height) = inspect_dimensions(payload, format)?;
    validate_dimensions(config, width, height)?;
    if format == ImageFormat::Jpeg {
        verify_jpeg_stream(payload)?;
    }

    let decoded = decode_pixels(payload, format, config, width, height)?;
    if (decoded.width(), decoded.height()) != (width, height) {
        return Err(DecodeError::DecodeFailed(format!(
            "解码尺寸 {}x{} 与头部声明 {}x{} 不一致",
            decoded.width(),
            decoded.height(),
            width,
            height
        )));
    }

    let image = pack_rgb(&decoded.into_rgb8())?;
    Ok((image, mime_type))
}

/// 把紧凑 RGB8 图像重新打包为对齐行宽的缓冲。
pub(crate) fn pack_rgb(rgb: &RgbImage) -> Result<DecodedImage, DecodeError> {
    let (width, height) = rgb.dimensions();
    let stride = row_stride(width)
        .ok_or_else(|| DecodeError::InvalidDimensions(format!("行宽溢出：宽度 {}", width)))?;
    let len = stride
        .checked_mul(height as usize)
        .ok_or_else(|| DecodeError::InvalidDimensions(format!("缓冲长度溢出：{}x{}", width, height)))?;

    let row_len = width as usize * 3;
    let mut data = vec![0u8; len];
    if row_len > 0 {
        for (dst, src) in data
            .chunks_exact_mut(stride)
            .zip(rgb.as_raw().chunks_exact(row_len))
        {
            dst[..row_len].copy_from_slice(src);
        }
    }

    Ok(DecodedImage::from_packed(width, height, stride, data))
}

fn sniff_format(payload: &[u8]) -> Result<(ImageFormat, Option<&'static str>), DecodeError> {
    let mime_type = match infer::get(payload) {
        Some(kind) if kind.matcher_type() != infer::MatcherType::Image => {
            return Err(DecodeError::UnsupportedOrCorruptFormat(format!(
                "载荷签名不是图片类型：{}",
                kind.mime_type()
            )));
        }
        Some(kind) => Some(kind.mime_type()),
        None => None,
    };

    let format = image::guess_format(payload)
        .map_err(|e| DecodeError::UnsupportedOrCorruptFormat(format!("无法识别图片格式：{}", e)))?;
    Ok((format, mime_type))
}

/// 仅通过图片头信息读取宽高。
fn inspect_dimensions(payload: &[u8], format: ImageFormat) -> Result<(u32, u32), DecodeError> {
    ImageReader::with_format(Cursor::new(payload), format)
        .into_dimensions()
        .map_err(|e| DecodeError::UnsupportedOrCorruptFormat(format!("无法读取图片尺寸：{}", e)))
}

fn validate_dimensions(config: &ThumbnailConfig, width: u32, height: u32) -> Result<(), DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions(format!(
            "尺寸为零：{}x{}",
            width, height
        )));
    }

    let pixels = (width as u64) * (height as u64);
    if pixels > config.max_decoded_pixels {
        return Err(DecodeError::InvalidDimensions(format!(
            "像素过多：{}x{} = {} 像素（限制：{} 像素）",
            width, height, pixels, config.max_decoded_pixels
        )));
    }

    let bytes = row_stride(width)
        .and_then(|stride| (stride as u64).checked_mul(height as u64))
        .ok_or_else(|| DecodeError::InvalidDimensions(format!("缓冲长度溢出：{}x{}", width, height)))?;
    if bytes > config.max_decoded_bytes || usize::try_from(bytes).is_err() {
        return Err(DecodeError::InvalidDimensions(format!(
            "解码缓冲过大：{:.2} MB（限制：{:.2} MB）",
            bytes as f64 / 1024.0 / 1024.0,
            config.max_decoded_bytes as f64 / 1024.0 / 1024.0
        )));
    }

    Ok(())
}

fn truncated(offset: usize) -> DecodeError {
    DecodeError::DecodeFailed(format!("JPEG 码流在偏移 {} 处截断", offset))
}

/// 沿段结构走完 JPEG 码流，直到扫描之后的 EOI。
///
/// 只检查结构，不做熵解码；EOI 之后的尾随字节忽略。
fn verify_jpeg_stream(payload: &[u8]) -> Result<(), DecodeError> {
    // SOI 已由签名探测确认。
    let mut pos = 2;
    let mut seen_scan = false;

    loop {
        let marker = read_marker(payload, &mut pos)?;
        match marker {
            0xD9 if seen_scan => return Ok(()),
            0xD9 => {
                return Err(DecodeError::DecodeFailed(
                    "JPEG 码流在任何扫描之前结束".to_string(),
                ));
            }
            // 无长度字段的独立标记。
            0x01 | 0xD0..=0xD7 => {}
            0x00 | 0x02..=0xBF => {
                return Err(DecodeError::DecodeFailed(format!(
                    "JPEG 偏移 {} 处标记无效：0x{:02X}",
                    pos - 1,
                    marker
                )));
            }
            0xDA => {
                pos = skip_segment(payload, pos)?;
                pos = skip_entropy_coded(payload, pos)?;
                seen_scan = true;
            }
            _ => pos = skip_segment(payload, pos)?,
        }
    }
}

/// 读取 `pos` 处的标记（允许前置填充 0xFF），返回标记码。
fn read_marker(payload: &[u8], pos: &mut usize) -> Result<u8, DecodeError> {
    match payload.get(*pos) {
        Some(0xFF) => {}
        Some(byte) => {
            return Err(DecodeError::DecodeFailed(format!(
                "JPEG 偏移 {} 处应为标记，实际为 0x{:02X}",
                *pos, byte
            )));
        }
        None => return Err(truncated(*pos)),
    }

    while payload.get(*pos) == Some(&0xFF) {
        *pos += 1;
    }
    let marker = *payload.get(*pos).ok_or_else(|| truncated(*pos))?;
    *pos += 1;
    Ok(marker)
}

/// 跳过带长度字段的段，返回段后偏移。
fn skip_segment(payload: &[u8], pos: usize) -> Result<usize, DecodeError> {
    let len_bytes = pos
        .checked_add(2)
        .and_then(|end| payload.get(pos..end))
        .ok_or_else(|| truncated(pos))?;
    let len = usize::from(u16::from_be_bytes([len_bytes[0], len_bytes[1]]));
    if len < 2 {
        return Err(DecodeError::DecodeFailed(format!(
            "JPEG 偏移 {} 处段长度无效：{}",
            pos, len
        )));
    }

    let end = pos.checked_add(len).ok_or_else(|| truncated(pos))?;
    if end > payload.len() {
        return Err(truncated(payload.len()));
    }
    Ok(end)
}

/// 跳过熵编码数据，返回下一个标记（0xFF 起始处）的偏移。
fn skip_entropy_coded(payload: &[u8], mut pos: usize) -> Result<usize, DecodeError> {
    let mut next_restart = 0u8;

    loop {
        let ff = payload
            .get(pos..)
            .and_then(|rest| rest.iter().position(|&b| b == 0xFF))
            .map(|i| pos + i)
            .ok_or_else(|| truncated(payload.len()))?;
        let code = *payload.get(ff + 1).ok_or_else(|| truncated(payload.len()))?;

        match code {
            // 字节填充
            0x00 => pos = ff + 2,
            // 连续 0xFF 是填充，从下一个 0xFF 继续
            0xFF => pos = ff + 1,
            0xD0..=0xD7 => {
                let index = code - 0xD0;
                if index != next_restart {
                    return Err(DecodeError::DecodeFailed(format!(
                        "JPEG 偏移 {} 处 RST 序号错乱：期望 {}，实际 {}",
                        ff, next_restart, index
                    )));
                }
                next_restart = (next_restart + 1) & 7;
                pos = ff + 2;
            }
            0xC0..=0xFE | 0x01 => return Ok(ff),
            other => {
                return Err(DecodeError::DecodeFailed(format!(
                    "JPEG 熵编码数据在偏移 {} 处包含非法标记 0x{:02X}",
                    ff, other
                )));
            }
        }
    }
}

fn decode_pixels(
    payload: &[u8],
    format: ImageFormat,
    config: &ThumbnailConfig,
    width: u32,
    height: u32,
) -> Result<DynamicImage, DecodeError> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(width);
    limits.max_image_height = Some(height);
    // 原生像素类型（RGBA、16 位等）可能比 RGB8 更宽。
    limits.max_alloc = Some(config.max_decoded_bytes.saturating_mul(4));

    let mut reader = ImageReader::with_format(Cursor::new(payload), format);
    reader.limits(limits);

    reader.decode().map_err(|e| match e {
        image::ImageError::Limits(limit) => {
            DecodeError::InvalidDimensions(format!("超出解码资源上限：{}", limit))
        }
        image::ImageError::Unsupported(unsupported) => {
            DecodeError::UnsupportedOrCorruptFormat(unsupported.to_string())
        }
        other => DecodeError::DecodeFailed(other.to_string()),
    })
}
