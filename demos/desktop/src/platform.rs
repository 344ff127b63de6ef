//! Platform services implementation.

use image::{DynamicImage, ImageError};
use opengl_demos::{Features, PlatformServices};
use std::{
  collections::HashMap,
  error::Error,
  fmt,
  path::{Path, PathBuf},
};

/// Desktop implementation of the [`PlatformServices`] API.
///
/// Textures are read from disk once, when the demo starts.
#[derive(Debug)]
pub struct DesktopPlatformServices {
  textures: HashMap<String, DynamicImage>,
}

impl DesktopPlatformServices {
  pub fn new(texture_root: impl AsRef<Path>, features: &Features) -> Result<Self, DesktopFetchError> {
    let texture_root = texture_root.as_ref();
    let textures = features
      .textures()
      .iter()
      .map(|name| {
        let path = texture_root.join(name);
        log::info!("loading texture {}", path.display());

        let texture = image::open(&path).map_err(|source| DesktopFetchError::CannotLoad {
          path: path.clone(),
          source,
        })?;

        Ok((name.clone(), texture))
      })
      .collect::<Result<_, DesktopFetchError>>()?;

    Ok(Self { textures })
  }
}

#[derive(Debug)]
pub enum DesktopFetchError {
  UnknownTexture(String),
  CannotLoad { path: PathBuf, source: ImageError },
}

impl fmt::Display for DesktopFetchError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      DesktopFetchError::UnknownTexture(ref name) => write!(f, "unknown texture to load: {}", name),
      DesktopFetchError::CannotLoad { ref path, ref source } => {
        write!(f, "cannot load texture {}: {}", path.display(), source)
      }
    }
  }
}

impl Error for DesktopFetchError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      DesktopFetchError::UnknownTexture(_) => None,
      DesktopFetchError::CannotLoad { source, .. } => Some(source),
    }
  }
}

impl PlatformServices for DesktopPlatformServices {
  type FetchError = DesktopFetchError;

  fn fetch_texture(&mut self, name: impl AsRef<str>) -> Result<&DynamicImage, Self::FetchError> {
    let name = name.as_ref();
    self
      .textures
      .get(name)
      .ok_or_else(|| DesktopFetchError::UnknownTexture(name.to_owned()))
  }
}

/// Errors that can happen while setting up the window.
#[derive(Debug)]
pub enum PlatformError {
  CannotCreateWindow,
}

impl fmt::Display for PlatformError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      PlatformError::CannotCreateWindow => f.write_str("cannot create window"),
    }
  }
}

impl Error for PlatformError {}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_texture_needs_no_directory() {
    let mut services =
      DesktopPlatformServices::new("/does/not/exist", &Features::none()).unwrap();

    assert!(matches!(
      services.fetch_texture("grass.png"),
      Err(DesktopFetchError::UnknownTexture(ref name)) if name == "grass.png"
    ));
  }

  #[test]
  fn missing_texture_reports_its_path() {
    let err = DesktopPlatformServices::new("/does/not/exist", &Features::none().texture("rock.png"))
      .unwrap_err();

    match err {
      DesktopFetchError::CannotLoad { ref path, .. } => {
        assert_eq!(path, &Path::new("/does/not/exist").join("rock.png"))
      }
      _ => panic!("unexpected error: {}", err),
    }
    assert!(err.source().is_some());
  }
}
