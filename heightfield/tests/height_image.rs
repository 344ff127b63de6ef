use heightfield::{HeightImage, HeightfieldError};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

#[test]
fn rejects_bad_channel_counts() {
  for &channels in &[0, 5, 255] {
    match HeightImage::new(1, 1, channels, vec![0; channels as usize]) {
      Err(HeightfieldError::InvalidChannelCount(c)) => assert_eq!(c, channels),
      r => panic!("unexpected result: {:?}", r),
    }
  }
}

#[test]
fn rejects_sample_count_mismatch() {
  match HeightImage::new(3, 2, 2, vec![0; 11]) {
    Err(HeightfieldError::SampleCountMismatch { expected, found }) => {
      assert_eq!(expected, 12);
      assert_eq!(found, 11);
    }
    r => panic!("unexpected result: {:?}", r),
  }
}

#[test]
fn rejects_more_pixels_than_u32_indices() {
  // 65536 × 65537 is one row past u32::MAX pixels
  match HeightImage::new(65536, 65537, 1, Vec::new()) {
    Err(HeightfieldError::TooLarge { width, height }) => assert_eq!((width, height), (65536, 65537)),
    r => panic!("unexpected result: {:?}", r),
  }

  assert!(matches!(
    HeightImage::flat(u32::MAX, 2),
    Err(HeightfieldError::TooLarge { .. })
  ));
}

#[test]
fn samples_by_channel() {
  let image = HeightImage::new(2, 1, 2, vec![1, 2, 3, 4]).unwrap();

  assert_eq!(image.pixel_count(), 2);
  assert_eq!(image.sample(0, 0), Some(1));
  assert_eq!(image.sample(0, 1), Some(2));
  assert_eq!(image.sample(1, 0), Some(3));
  assert_eq!(image.sample(1, 1), Some(4));
  assert_eq!(image.sample(1, 2), None);
  assert_eq!(image.sample(2, 0), None);
}

#[test]
fn flat_is_all_zero() {
  let image = HeightImage::flat(3, 2).unwrap();

  assert_eq!(image.channels(), 1);
  assert_eq!(image.samples(), &[0; 6]);
}

#[test]
fn dynamic_luma_keeps_single_channel() {
  let gray = GrayImage::from_fn(4, 3, |x, y| Luma([(x + y * 4) as u8]));
  let image = HeightImage::from_dynamic(&DynamicImage::ImageLuma8(gray)).unwrap();

  assert_eq!((image.width(), image.height(), image.channels()), (4, 3, 1));
  assert_eq!(image.sample(5, 0), Some(5));
}

#[test]
fn dynamic_rgb_keeps_channel_stride() {
  let rgb = RgbImage::from_fn(2, 2, |x, y| Rgb([(x + 2 * y) as u8 * 10, 7, 9]));
  let image = HeightImage::from_dynamic(&DynamicImage::ImageRgb8(rgb)).unwrap();

  assert_eq!(image.channels(), 3);
  assert_eq!(image.samples().len(), 12);
  assert_eq!(image.sample(3, 0), Some(30));
  assert_eq!(image.sample(3, 1), Some(7));
}

#[test]
fn dynamic_16_bit_is_converted_to_luma() {
  let gray16: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(2, 2, Luma([u16::MAX]));
  let image = HeightImage::from_dynamic(&DynamicImage::ImageLuma16(gray16)).unwrap();

  assert_eq!(image.channels(), 1);
  assert_eq!(image.samples(), &[255; 4]);
}

#[test]
fn open_missing_file_reports_path() {
  let err = HeightImage::open("does/not/exist/heightmap.png").unwrap_err();

  match err {
    HeightfieldError::ImageLoad { ref path, .. } => {
      assert!(path.ends_with("heightmap.png"));
    }
    ref e => panic!("unexpected error: {:?}", e),
  }

  assert!(err.to_string().contains("heightmap.png"));
}

#[test]
fn from_memory_rejects_garbage() {
  match HeightImage::from_memory(b"definitely not an image") {
    Err(HeightfieldError::ImageDecode(_)) => (),
    r => panic!("unexpected result: {:?}", r),
  }
}
