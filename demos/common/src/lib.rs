//! OpenGL demos.
//!
//! This project provides a set of demos that can be run on any platform providing an OpenGL 3.3
//! context. The demos are made platform-agnostic on purpose: window creation, event polling and
//! asset loading are left to the platform code running them.
//!
//! # Demo architecture
//!
//! Demos are simple modules exposed from this crate. They do not depend on any platform-specific
//! concepts, such as system events or system window capacities. For that reason, whenever a demo
//! requires user interaction, an abstract type ([`InputAction`]) is used from this crate, which is
//! produced by the platform code running the demo.
//!
//! Demos are responsible in allocating the luminance resources and implementing their render loop
//! by using the [`Example`] trait.
//!
//! # Error handling
//!
//! Bootstrapping a demo can fail (missing texture, invalid heightmap, shader that doesn’t compile,
//! etc.). Such failures are reported as [`DemoError`] and it’s up to the platform code to log them
//! and stop.

use image::DynamicImage;
use luminance_front::{context::GraphicsContext, framebuffer::Framebuffer, texture::Dim2, Backend};
use std::{error::Error, fmt};

pub mod camera;
mod shared;
pub mod terrain;
pub mod textured_cube;

/// Demo interface.
pub trait Example: Sized {
  /// Features required by the demo.
  fn features() -> Features {
    Features::none()
  }

  /// Bootstrap the demo.
  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError>;

  /// Render a frame of the demo.
  fn render_frame(
    self,
    time: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self>;
}

/// A type used to pass “inputs” to demos.
#[derive(Clone, Debug, PartialEq)]
pub enum InputAction {
  /// Quit the application.
  Quit,

  /// Main action. Typically used to switch an effect on and off or to cycle through it.
  MainToggle,

  /// Auxiliary action. Often used to showcase / toggle smaller parts of a bigger effect.
  AuxiliaryToggle,

  /// Forward direction. Typically used to move forward.
  Forward,

  /// Backward direction. Typically used to move backward.
  Backward,

  /// Left direction. Typically used to strafe left.
  Left,

  /// Right direction. Typically used to strafe right.
  Right,

  /// Up direction. Typically used to move up.
  Up,

  /// Down direction. Typically used to move down.
  Down,

  /// Primary action (e.g. left mouse button) pressed.
  PrimaryPressed,

  /// Primary action released.
  PrimaryReleased,

  /// Cursor moved, in window coordinates.
  CursorMoved { x: f32, y: f32 },

  /// Vertical scroll.
  VScroll { amount: f32 },

  /// Framebuffer size changed.
  Resized { width: u32, height: u32 },
}

/// What to do after a frame has been rendered.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum LoopFeedback<T> {
  Continue(T),
  Exit,
}

/// Platform services that demos can use.
pub trait PlatformServices {
  type FetchError: Error + 'static;

  /// Get a texture previously requested via [`Features::texture`].
  fn fetch_texture(&mut self, name: impl AsRef<str>) -> Result<&DynamicImage, Self::FetchError>;
}

/// Features a demo requires from the platform.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Features {
  textures: Vec<String>,
}

impl Features {
  /// No features.
  pub fn none() -> Self {
    Self::default()
  }

  /// Require a texture to be loaded before the demo starts.
  pub fn texture(mut self, name: impl Into<String>) -> Self {
    self.textures.push(name.into());
    self
  }

  /// Textures to load.
  pub fn textures(&self) -> &[String] {
    &self.textures
  }
}

/// Errors that can prevent a demo from starting.
#[derive(Debug)]
pub enum DemoError {
  /// The platform couldn’t provide a texture.
  CannotFetchTexture(String, Box<dyn Error>),
  /// The heightmap is not usable.
  InvalidHeightmap(heightfield::HeightfieldError),
  /// A GPU texture couldn’t be created.
  CannotCreateTexture(Box<dyn Error>),
  /// A tessellation couldn’t be created.
  CannotCreateTess(Box<dyn Error>),
  /// A shader program couldn’t be created.
  CannotCreateProgram(Box<dyn Error>),
}

impl fmt::Display for DemoError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      DemoError::CannotFetchTexture(ref name, ref e) => {
        write!(f, "cannot fetch texture {}: {}", name, e)
      }

      DemoError::InvalidHeightmap(ref e) => write!(f, "invalid heightmap: {}", e),

      DemoError::CannotCreateTexture(ref e) => write!(f, "cannot create texture: {}", e),

      DemoError::CannotCreateTess(ref e) => write!(f, "cannot create tessellation: {}", e),

      DemoError::CannotCreateProgram(ref e) => write!(f, "cannot create shader program: {}", e),
    }
  }
}

impl Error for DemoError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      DemoError::CannotFetchTexture(_, e) => Some(e.as_ref()),
      DemoError::InvalidHeightmap(e) => Some(e),
      DemoError::CannotCreateTexture(e)
      | DemoError::CannotCreateTess(e)
      | DemoError::CannotCreateProgram(e) => Some(e.as_ref()),
    }
  }
}

impl From<heightfield::HeightfieldError> for DemoError {
  fn from(e: heightfield::HeightfieldError) -> Self {
    DemoError::InvalidHeightmap(e)
  }
}
