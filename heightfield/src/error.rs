//! Errors that can happen while getting a height image ready for mesh generation.

use image::ImageError;
use std::{error, fmt, path::PathBuf};

/// Error that can be risen while loading or building a [`HeightImage`](crate::HeightImage).
///
/// Mesh generation itself cannot fail: once a [`HeightImage`](crate::HeightImage) exists, its
/// dimensions and samples are known to be consistent.
#[non_exhaustive]
#[derive(Debug)]
pub enum HeightfieldError {
  /// The image file could not be opened or decoded.
  ImageLoad {
    /// Path of the file that was requested.
    path: PathBuf,
    /// Underlying decoder error.
    source: ImageError,
  },

  /// An in-memory image could not be decoded.
  ImageDecode(ImageError),

  /// Only 1 to 4 samples per pixel are supported.
  InvalidChannelCount(u8),

  /// The sample buffer doesn’t match `width × height × channels`.
  SampleCountMismatch {
    /// Expected number of samples.
    expected: usize,
    /// Number of samples actually provided.
    found: usize,
  },

  /// The image has more pixels than a `u32` vertex index can address.
  TooLarge {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
  },
}

impl fmt::Display for HeightfieldError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      HeightfieldError::ImageLoad {
        ref path,
        ref source,
      } => write!(f, "cannot load height image {}: {}", path.display(), source),

      HeightfieldError::ImageDecode(ref e) => write!(f, "cannot decode height image: {}", e),

      HeightfieldError::InvalidChannelCount(channels) => {
        write!(f, "invalid channel count: {} (expected 1 to 4)", channels)
      }

      HeightfieldError::SampleCountMismatch { expected, found } => write!(
        f,
        "sample count mismatch: expected {} samples, found {}",
        expected, found
      ),

      HeightfieldError::TooLarge { width, height } => write!(
        f,
        "height image too large: {}×{} pixels (at most {} allowed)",
        width,
        height,
        u32::MAX
      ),
    }
  }
}

impl error::Error for HeightfieldError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      HeightfieldError::ImageLoad { source, .. } => Some(source),
      HeightfieldError::ImageDecode(e) => Some(e),
      _ => None,
    }
  }
}

impl From<ImageError> for HeightfieldError {
  fn from(e: ImageError) -> Self {
    HeightfieldError::ImageDecode(e)
  }
}
