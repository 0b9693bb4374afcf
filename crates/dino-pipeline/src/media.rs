//! Media type resolution for attached files.
//!
//! Only PNG, GIF and JPEG are recognized from content. Anything else must be
//! described by the caller with both a media type and an extension.

use image::ImageFormat;

use crate::error::PipelineError;

/// Media kinds recognized from file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Png,
    Gif,
    Jpeg,
}

impl MediaKind {
    const ALL: [Self; 3] = [Self::Png, Self::Gif, Self::Jpeg];

    #[must_use]
    pub fn media_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
        }
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Jpeg => "jpeg",
        }
    }

    #[must_use]
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.media_type() == media_type)
    }
}

/// Outcome of content sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Detected(MediaKind),
    Unsupported,
}

/// Sniff the media kind from the leading bytes of a file.
#[must_use]
pub fn detect(bytes: &[u8]) -> Detection {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Detection::Detected(MediaKind::Png),
        Ok(ImageFormat::Gif) => Detection::Detected(MediaKind::Gif),
        Ok(ImageFormat::Jpeg) => Detection::Detected(MediaKind::Jpeg),
        _ => Detection::Unsupported,
    }
}

/// Extension and media type a staged file is published with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub extension: String,
    pub media_type: String,
}

/// Resolve the extension and media type for `bytes`.
///
/// Caller-supplied values are trusted. A missing media type is detected from
/// content; a missing extension is derived from the media type.
///
/// # Errors
///
/// Returns [`PipelineError::UnsupportedMediaType`] when detection fails or
/// the media type has no known extension, and
/// [`PipelineError::InvalidInput`] for an extension that is not a plain
/// alphanumeric suffix.
pub fn resolve(
    bytes: &[u8],
    media_type: Option<&str>,
    extension: Option<&str>,
) -> Result<ResolvedMedia, PipelineError> {
    if let Some(ext) = extension {
        validate_extension(ext)?;
    }

    let media_type = match media_type {
        Some(media_type) => media_type.to_owned(),
        None => match detect(bytes) {
            Detection::Detected(kind) => kind.media_type().to_owned(),
            Detection::Unsupported => {
                return Err(PipelineError::UnsupportedMediaType(
                    "could not detect media type from content".to_owned(),
                ));
            }
        },
    };

    let extension = match extension {
        Some(ext) => ext.to_owned(),
        None => MediaKind::from_media_type(&media_type)
            .ok_or_else(|| PipelineError::UnsupportedMediaType(media_type.clone()))?
            .extension()
            .to_owned(),
    };

    Ok(ResolvedMedia {
        extension,
        media_type,
    })
}

fn validate_extension(ext: &str) -> Result<(), PipelineError> {
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(PipelineError::InvalidInput(format!(
            "media extension must be alphanumeric, got {ext:?}"
        )));
    }
    Ok(())
}
