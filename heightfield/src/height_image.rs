//! Decoded height images.
//!
//! A [`HeightImage`] is the in-memory, validated form of a heightmap: a row-major grid of 8-bit
//! samples with 1 to 4 channels per pixel. Only the first channel of a pixel is used as elevation;
//! the other ones are carried along so that the very same decoded image can also be uploaded as a
//! texture.

use crate::error::HeightfieldError;
use image::{DynamicImage, GenericImageView as _};
use std::path::Path;

// Vertex indices are u32, so every pixel index must fit in one.
const MAX_PIXELS: u64 = u32::MAX as u64;

/// Immutable, validated height image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeightImage {
  width: u32,
  height: u32,
  channels: u8,
  samples: Vec<u8>,
}

impl HeightImage {
  /// Wrap raw row-major samples.
  ///
  /// `samples` must hold exactly `width * height * channels` bytes, `channels` must be in `1..=4`
  /// and the image must have at most `u32::MAX` pixels.
  pub fn new(
    width: u32,
    height: u32,
    channels: u8,
    samples: Vec<u8>,
  ) -> Result<Self, HeightfieldError> {
    if !(1..=4).contains(&channels) {
      return Err(HeightfieldError::InvalidChannelCount(channels));
    }

    check_size(width, height)?;

    let expected = width as usize * height as usize * channels as usize;
    if samples.len() != expected {
      return Err(HeightfieldError::SampleCountMismatch {
        expected,
        found: samples.len(),
      });
    }

    Ok(HeightImage {
      width,
      height,
      channels,
      samples,
    })
  }

  /// A single-channel image with every sample at zero.
  ///
  /// Generating a mesh from it yields a flat grid at `y = 0`, sharing the grid layout and UVs of
  /// any other image of the same size.
  pub fn flat(width: u32, height: u32) -> Result<Self, HeightfieldError> {
    check_size(width, height)?;

    Ok(HeightImage {
      width,
      height,
      channels: 1,
      samples: vec![0; width as usize * height as usize],
    })
  }

  /// Build a height image out of an already decoded image.
  ///
  /// 8-bit luma, luma-alpha, RGB and RGBA images keep their channel layout. Anything else is
  /// converted to 8-bit luma first.
  pub fn from_dynamic(img: &DynamicImage) -> Result<Self, HeightfieldError> {
    let (width, height) = img.dimensions();

    match img {
      DynamicImage::ImageLuma8(_)
      | DynamicImage::ImageLumaA8(_)
      | DynamicImage::ImageRgb8(_)
      | DynamicImage::ImageRgba8(_) => {
        let channels = img.color().channel_count();
        HeightImage::new(width, height, channels, img.as_bytes().to_vec())
      }

      _ => {
        log::debug!("converting {:?} height image to 8-bit luma", img.color());
        HeightImage::new(width, height, 1, img.to_luma8().into_raw())
      }
    }
  }

  /// Decode a height image from a file on disk.
  pub fn open(path: impl AsRef<Path>) -> Result<Self, HeightfieldError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| HeightfieldError::ImageLoad {
      path: path.to_owned(),
      source,
    })?;

    Self::from_dynamic(&img)
  }

  /// Decode a height image from an encoded in-memory buffer (PNG, JPEG, …).
  pub fn from_memory(bytes: &[u8]) -> Result<Self, HeightfieldError> {
    let img = image::load_from_memory(bytes)?;
    Self::from_dynamic(&img)
  }

  /// Width in pixels.
  pub fn width(&self) -> u32 {
    self.width
  }

  /// Height in pixels.
  pub fn height(&self) -> u32 {
    self.height
  }

  /// Number of samples per pixel.
  pub fn channels(&self) -> u8 {
    self.channels
  }

  /// Raw row-major samples.
  pub fn samples(&self) -> &[u8] {
    &self.samples
  }

  /// Number of pixels.
  pub fn pixel_count(&self) -> usize {
    self.width as usize * self.height as usize
  }

  /// Sample `channel` of the pixel at flat index `index` (`z * width + x`).
  pub fn sample(&self, index: usize, channel: u8) -> Option<u8> {
    if channel >= self.channels {
      return None;
    }

    self
      .samples
      .get(index * self.channels as usize + channel as usize)
      .copied()
  }
}

fn check_size(width: u32, height: u32) -> Result<(), HeightfieldError> {
  if u64::from(width) * u64::from(height) > MAX_PIXELS {
    Err(HeightfieldError::TooLarge { width, height })
  } else {
    Ok(())
  }
}
