use std::sync::Arc;

use futures_util::future::try_join_all;
use image::imageops::FilterType;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tracing::debug;

use crate::constants::{
    HERO_JPEG_QUALITY, HERO_WEBP_QUALITY, PLACEHOLDER_WEBP_QUALITY, PLACEHOLDER_WIDTH,
};
use crate::domain::entities::hero_image::HeroSize;
use crate::errors::AppError;

/// One resized and re-encoded copy of the source at a target width.
#[derive(Debug)]
pub struct EncodedVariant {
    pub size: HeroSize,
    /// Actual emitted width: the configured width, or the source width when
    /// the source is narrower (variants are never upscaled).
    pub width: u32,
    pub webp: Vec<u8>,
    pub jpeg: Vec<u8>,
}

#[derive(Debug)]
pub struct EncodedVariantSet {
    pub source_width: u32,
    pub source_height: u32,
    pub variants: Vec<EncodedVariant>,
    pub placeholder: Vec<u8>,
}

/// Decodes the source and produces every configured hero variant plus the
/// blurred placeholder. Pure transform over bytes; callers persist the
/// outputs. Per-size encodes run concurrently and the first failure wins.
pub async fn encode_variants(source: &[u8]) -> Result<EncodedVariantSet, AppError> {
    let bytes = source.to_vec();
    let img = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| AppError::InternalError(format!("encode task panicked: {}", e)))?
        .map_err(|e| AppError::ImageDecode(e.to_string()))?;

    let source_width = img.width();
    let source_height = img.height();
    let img = Arc::new(img);

    let mut tasks = Vec::with_capacity(HeroSize::all().len());
    for size in HeroSize::all() {
        let img = Arc::clone(&img);
        let size = *size;
        tasks.push(tokio::task::spawn_blocking(move || encode_one(&img, size)));
    }

    let placeholder_img = Arc::clone(&img);
    let placeholder_task =
        tokio::task::spawn_blocking(move || encode_placeholder(&placeholder_img));

    let variants = try_join_all(tasks)
        .await
        .map_err(|e| AppError::InternalError(format!("encode task panicked: {}", e)))?
        .into_iter()
        .collect::<Result<Vec<_>, AppError>>()?;

    let placeholder = placeholder_task
        .await
        .map_err(|e| AppError::InternalError(format!("encode task panicked: {}", e)))??;

    debug!(
        source_width,
        source_height,
        variants = variants.len(),
        "hero variants encoded"
    );

    Ok(EncodedVariantSet {
        source_width,
        source_height,
        variants,
        placeholder,
    })
}

fn encode_one(img: &DynamicImage, size: HeroSize) -> Result<EncodedVariant, AppError> {
    let resized = resize_to_width(img, size.width());
    Ok(EncodedVariant {
        size,
        width: resized.width(),
        webp: encode_webp(&resized, HERO_WEBP_QUALITY)?,
        jpeg: encode_jpeg(&resized, HERO_JPEG_QUALITY)?,
    })
}

fn encode_placeholder(img: &DynamicImage) -> Result<Vec<u8>, AppError> {
    let tiny = resize_to_width(img, PLACEHOLDER_WIDTH).blur(2.0);
    encode_webp(&tiny, PLACEHOLDER_WEBP_QUALITY)
}

/// Cover-fit scale to the target width, keeping the aspect ratio and never
/// exceeding the source's native width.
fn resize_to_width(img: &DynamicImage, target_width: u32) -> DynamicImage {
    if img.width() <= target_width {
        img.clone()
    } else {
        img.resize(target_width, u32::MAX, FilterType::Lanczos3)
    }
}

fn encode_webp(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, AppError> {
    let rgba = img.to_rgba8();
    let encoded = webp::Encoder::from_rgba(&rgba, rgba.width(), rgba.height()).encode(quality);
    Ok(encoded.to_vec())
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, AppError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| AppError::InternalError(format!("JPEG encode failed: {}", e)))?;
    Ok(buf)
}

/// Fit-inside resize used by the cache-aware resize endpoint: bounded by
/// both dimensions, no upscaling, WebP output.
pub fn resize_inside_webp(
    img: &DynamicImage,
    width: u32,
    height: u32,
    quality: f32,
) -> Result<Vec<u8>, AppError> {
    let width = width.min(img.width());
    let height = height.min(img.height());
    let resized = img.resize(width, height, FilterType::Lanczos3);
    encode_webp(&resized, quality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, 90);
        encoder.encode_image(&img).unwrap();
        buf
    }

    #[actix_rt::test]
    async fn produces_one_variant_per_size_plus_placeholder() {
        let set = encode_variants(&sample_jpeg(1200, 900)).await.unwrap();

        assert_eq!(set.variants.len(), HeroSize::all().len());
        assert_eq!(set.source_width, 1200);
        assert!(!set.placeholder.is_empty());

        for variant in &set.variants {
            assert_eq!(
                image::guess_format(&variant.webp).unwrap(),
                image::ImageFormat::WebP
            );
            assert_eq!(
                image::guess_format(&variant.jpeg).unwrap(),
                image::ImageFormat::Jpeg
            );
        }
        assert_eq!(
            image::guess_format(&set.placeholder).unwrap(),
            image::ImageFormat::WebP
        );
    }

    #[actix_rt::test]
    async fn never_upscales_past_source_width() {
        let set = encode_variants(&sample_jpeg(1200, 900)).await.unwrap();

        for variant in &set.variants {
            if variant.size.width() > 1200 {
                assert_eq!(variant.width, 1200, "size {:?}", variant.size);
            } else {
                assert_eq!(variant.width, variant.size.width(), "size {:?}", variant.size);
            }
            let decoded = image::load_from_memory(&variant.jpeg).unwrap();
            assert_eq!(decoded.width(), variant.width);
        }
    }

    #[actix_rt::test]
    async fn placeholder_is_tiny() {
        let set = encode_variants(&sample_jpeg(640, 480)).await.unwrap();
        let decoded = image::load_from_memory(&set.placeholder).unwrap();
        assert_eq!(decoded.width(), PLACEHOLDER_WIDTH);
    }

    #[actix_rt::test]
    async fn rejects_undecodable_bytes() {
        let err = encode_variants(b"definitely not an image").await.unwrap_err();
        assert!(matches!(err, AppError::ImageDecode(_)));
    }

    #[test]
    fn resize_inside_respects_both_bounds() {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(800, 600));
        let out = resize_inside_webp(&img, 400, 400, 85.0).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert!(decoded.width() <= 400 && decoded.height() <= 400);

        // No upscaling: asking for more than the source gives the source size
        let out = resize_inside_webp(&img, 4000, 4000, 85.0).unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!(decoded.dimensions(), (800, 600));
    }
}
