//! # 宿主侧缩放模块
//!
//! ## 设计思路
//!
//! 解码器始终返回原始分辨率，请求尺寸只是提示；是否缩放由宿主层决定。
//! 本模块就是这一层：长边大于请求尺寸时等比缩小，长边恰好等于请求尺寸。
//!
//! ## 实现思路
//!
//! - 优先使用 `fast_image_resize`（卷积缩放，RGB8）。
//! - 失败时回退 `image::imageops::resize`。
//! - 输出重新按 4 字节对齐打包，与解码器约定一致。

use fast_image_resize as fr;
use image::RgbImage;
use image::imageops::FilterType;

use super::decoder::pack_rgb;
use super::export::to_rgb_image;
use super::source::DecodedImage;
use super::ThumbnailError;

/// 把图像等比缩小到长边不超过 `requested_size`。
///
/// `requested_size == 0` 或图像已经足够小时原样返回。
pub fn fit_to_requested(
    image: &DecodedImage,
    requested_size: u32,
    filter: FilterType,
) -> Result<DecodedImage, ThumbnailError> {
    let (width, height) = (image.width(), image.height());
    if requested_size == 0 || width.max(height) <= requested_size {
        return Ok(image.clone());
    }

    let (target_width, target_height) = fit_dimensions(width, height, requested_size);

    log::debug!(
        "🧩 缩略图降采样：{}x{} -> {}x{}（filter={:?}）",
        width,
        height,
        target_width,
        target_height,
        filter
    );

    let source = to_rgb_image(image)?;
    let resized = match resize_with_fast_image_resize(&source, target_width, target_height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 降采样失败，回退 image::imageops::resize：{}", err);
            image::imageops::resize(&source, target_width, target_height, filter)
        }
    };

    pack_rgb(&resized).map_err(|e| ThumbnailError::Resize(e.to_string()))
}

/// 长边对齐到 `requested_size`，短边按比例四舍五入，至少 1。
fn fit_dimensions(width: u32, height: u32, requested_size: u32) -> (u32, u32) {
    let scale = |short: u32, long: u32| -> u32 {
        let scaled = (short as u64 * requested_size as u64 + long as u64 / 2) / long as u64;
        (scaled as u32).max(1)
    };

    if width >= height {
        (requested_size, scale(height, width))
    } else {
        (scale(width, height), requested_size)
    }
}

fn resize_with_fast_image_resize(
    source: &RgbImage,
    target_width: u32,
    target_height: u32,
    filter: FilterType,
) -> Result<RgbImage, ThumbnailError> {
    let (src_width, src_height) = source.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        source.as_raw().clone(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| ThumbnailError::Resize(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x3);

    let mut resizer = fr::Resizer::new();
    let options =
        fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(to_fast_filter(filter)));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| ThumbnailError::Resize(format!("fast_image_resize 执行失败：{}", e)))?;

    RgbImage::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| ThumbnailError::Resize("fast_image_resize 输出缓冲长度异常".to_string()))
}

fn to_fast_filter(filter: FilterType) -> fr::FilterType {
    match filter {
        FilterType::Nearest => fr::FilterType::Box,
        FilterType::Triangle => fr::FilterType::Bilinear,
        FilterType::CatmullRom => fr::FilterType::CatmullRom,
        FilterType::Gaussian => fr::FilterType::Mitchell,
        FilterType::Lanczos3 => fr::FilterType::Lanczos3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thumbnail::decode;
    use crate::thumbnail::fixtures::{jpeg_bytes, png_bytes};

    #[test]
    fn fit_dimensions_keeps_aspect_ratio() {
        assert_eq!(fit_dimensions(200, 100, 96), (96, 48));
        assert_eq!(fit_dimensions(100, 200, 96), (48, 96));
        assert_eq!(fit_dimensions(1000, 1, 10), (10, 1));
        assert_eq!(fit_dimensions(300, 300, 64), (64, 64));
    }

    #[test]
    fn small_images_are_returned_unchanged() {
        let decoded = decode(&png_bytes(40, 20), 0).expect("png should decode");

        let fitted = fit_to_requested(&decoded, 64, FilterType::Triangle).expect("fit should succeed");
        assert_eq!(fitted, decoded);

        let unbounded = fit_to_requested(&decoded, 0, FilterType::Triangle).expect("fit should succeed");
        assert_eq!(unbounded, decoded);
    }

    #[test]
    fn large_images_are_downscaled_with_padded_stride() {
        let decoded = decode(&jpeg_bytes(200, 100), 0).expect("jpeg should decode");

        for filter in [FilterType::Nearest, FilterType::Triangle, FilterType::Lanczos3] {
            let fitted = fit_to_requested(&decoded, 33, filter).expect("fit should succeed");

            assert_eq!((fitted.width(), fitted.height()), (33, 17));
            assert_eq!(fitted.stride(), 100);
            assert_eq!(fitted.data().len(), 17 * 100);
        }
    }
}
