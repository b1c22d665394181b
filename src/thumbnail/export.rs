//! # 导出模块
//!
//! 将对齐行宽的 `DecodedImage` 转为宿主常用的输出形式：
//! 紧凑 `RgbImage`、PNG 字节、`data:image/png;base64,...`。

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

use super::source::DecodedImage;
use super::ThumbnailError;

/// 去掉行填充，得到紧凑的 `RgbImage`。
pub fn to_rgb_image(image: &DecodedImage) -> Result<RgbImage, ThumbnailError> {
    let tight: Vec<u8> = image.rows().flatten().copied().collect();
    RgbImage::from_raw(image.width(), image.height(), tight)
        .ok_or_else(|| ThumbnailError::Encode("像素数据长度与尺寸不一致".to_string()))
}

/// 编码为 PNG。
pub fn encode_png(image: &DecodedImage) -> Result<Vec<u8>, ThumbnailError> {
    let rgb = to_rgb_image(image)?;
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb)
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ThumbnailError::Encode(format!("PNG 编码失败：{}", e)))?;
    Ok(cursor.into_inner())
}

/// 编码为 PNG Data URL，便于直接嵌入网页响应。
pub fn to_png_data_url(image: &DecodedImage) -> Result<String, ThumbnailError> {
    let png = encode_png(image)?;
    Ok(format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png)
    ))
}
