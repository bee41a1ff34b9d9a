use std::io::Cursor;

use lofty::file::AudioFile;
use lofty::probe::Probe;
use tracing::warn;

use crate::errors::AppError;

/// Intrinsic properties extracted from uploaded bytes before the metadata
/// row is inserted.
#[derive(Debug, Default, PartialEq)]
pub struct ProbedMetadata {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration_seconds: Option<f64>,
}

/// Probes dimensions for images and duration for audio/video. A failed
/// image or audio probe fails the whole upload; video containers outside
/// the probe's reach degrade to an unknown duration.
pub fn probe_metadata(mime_type: &str, bytes: &[u8]) -> Result<ProbedMetadata, AppError> {
    if mime_type.starts_with("image/") {
        // SVG is a vector format; there are no intrinsic pixel dimensions.
        if mime_type == "image/svg+xml" {
            return Ok(ProbedMetadata::default());
        }
        let img = image::load_from_memory(bytes)
            .map_err(|e| AppError::ImageDecode(e.to_string()))?;
        return Ok(ProbedMetadata {
            width: Some(img.width() as i32),
            height: Some(img.height() as i32),
            duration_seconds: None,
        });
    }

    if mime_type.starts_with("audio/") {
        let duration = probe_duration(bytes).map_err(|e| {
            AppError::FileUpload(format!("Could not read audio properties: {}", e))
        })?;
        return Ok(ProbedMetadata {
            width: None,
            height: None,
            duration_seconds: Some(duration),
        });
    }

    if mime_type.starts_with("video/") {
        // MP4 is readable; other containers fall back to unknown duration.
        match probe_duration(bytes) {
            Ok(duration) => {
                return Ok(ProbedMetadata {
                    width: None,
                    height: None,
                    duration_seconds: Some(duration),
                })
            }
            Err(e) => {
                warn!("video duration probe failed, storing without duration: {}", e);
                return Ok(ProbedMetadata::default());
            }
        }
    }

    Ok(ProbedMetadata::default())
}

fn probe_duration(bytes: &[u8]) -> anyhow::Result<f64> {
    let tagged = Probe::new(Cursor::new(bytes)).guess_file_type()?.read()?;
    Ok(tagged.properties().duration().as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;

    #[test]
    fn probes_image_dimensions() {
        let img = image::RgbImage::new(64, 48);
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, 90).encode_image(&img).unwrap();

        let probed = probe_metadata("image/jpeg", &buf).unwrap();
        assert_eq!(probed.width, Some(64));
        assert_eq!(probed.height, Some(48));
        assert_eq!(probed.duration_seconds, None);
    }

    #[test]
    fn image_probe_failure_is_fatal() {
        let err = probe_metadata("image/png", b"garbage").unwrap_err();
        assert!(matches!(err, AppError::ImageDecode(_)));
    }

    #[test]
    fn audio_probe_failure_is_fatal() {
        let err = probe_metadata("audio/mpeg", b"garbage").unwrap_err();
        assert!(matches!(err, AppError::FileUpload(_)));
    }

    #[test]
    fn svg_and_documents_probe_to_nothing() {
        assert_eq!(
            probe_metadata("image/svg+xml", b"<svg/>").unwrap(),
            ProbedMetadata::default()
        );
        assert_eq!(
            probe_metadata("application/pdf", b"%PDF").unwrap(),
            ProbedMetadata::default()
        );
    }
}
