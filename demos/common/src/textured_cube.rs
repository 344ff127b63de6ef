//! A lit cube mixing two textures and perturbing its normals with a normal map.
//!
//! The cube is seen from a fixed camera and lit by a fixed point light. Each of its 24 vertices
//! carries its own tangent space so that the normal map can be applied per face.
//!
//! Press the <main action> to start / stop rotating the cube around its vertical axis.
//!
//! Required textures: `container.jpg`, `awesomeface.png` and `containerNormal.png`.
//!
//! <https://docs.rs/luminance>

use crate::{
  shared::{cube, load_texture, CubeVertex, RGBATexture, Semantics, VertexIndex},
  DemoError, Example, Features, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::{perspective, Deg, Matrix4, Point3, Rad, Vector3};
use luminance::UniformInterface;
use luminance_front::{
  context::GraphicsContext,
  framebuffer::Framebuffer,
  pipeline::{PipelineState, TextureBinding},
  pixel::NormUnsigned,
  render_state::RenderState,
  shader::{
    types::{Mat44, Vec3},
    Program, Uniform,
  },
  tess::{Mode, Tess},
  texture::Dim2,
  Backend,
};

const VS: &str = include_str!("textured-cube-vs.glsl");
const FS: &str = include_str!("textured-cube-fs.glsl");

const DIFFUSE_TEXTURE: &str = "container.jpg";
const OVERLAY_TEXTURE: &str = "awesomeface.png";
const NORMAL_TEXTURE: &str = "containerNormal.png";

const CLEAR_COLOR: [f32; 4] = [0.5, 0.2, 0.9, 1.];
const LIGHT_POSITION: [f32; 3] = [3., 2.5, 1.];
const CAMERA_POSITION: [f32; 3] = [0., 2.5, -5.];
const FOVY_DEG: f32 = 20.;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.;
// initial rotation around Y, in degrees
const CUBE_ANGLE_DEG: f32 = 45.;
// radians per second
const SPIN_SPEED: f32 = 0.8;

#[derive(UniformInterface)]
struct ShaderInterface {
  #[uniform(unbound)]
  world: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  view: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  projection: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  light_position: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  camera_position: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  texture1: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  #[uniform(unbound)]
  texture2: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  #[uniform(unbound)]
  texture1_normal: Uniform<TextureBinding<Dim2, NormUnsigned>>,
}

/// Animation and projection state of the cube.
#[derive(Clone, Debug, PartialEq)]
pub struct Spin {
  projection: Matrix4<f32>,
  angle: f32,
  spinning: bool,
  last_t: Option<f32>,
}

impl Spin {
  pub fn new() -> Self {
    Spin {
      // the real aspect ratio is known on the first Resized action
      projection: perspective(Deg(FOVY_DEG), 16. / 9., Z_NEAR, Z_FAR),
      angle: Rad::from(Deg(CUBE_ANGLE_DEG)).0,
      spinning: false,
      last_t: None,
    }
  }

  /// Apply an input action; returns [`LoopFeedback::Exit`] when the demo should stop.
  pub fn handle(&mut self, action: &InputAction) -> LoopFeedback<()> {
    match *action {
      InputAction::Quit => return LoopFeedback::Exit,

      InputAction::MainToggle => {
        self.spinning = !self.spinning;
        log::info!("spinning: {}", self.spinning);
      }

      InputAction::Resized { width, height } if height > 0 => {
        log::debug!("resized: {}×{}", width, height);
        let aspect_ratio = width as f32 / height as f32;
        self.projection = perspective(Deg(FOVY_DEG), aspect_ratio, Z_NEAR, Z_FAR);
      }

      _ => (),
    }

    LoopFeedback::Continue(())
  }

  /// Move the animation forward to time `t`, in seconds.
  pub fn advance(&mut self, t: f32) {
    let dt = t - self.last_t.unwrap_or(t);
    self.last_t = Some(t);

    if self.spinning {
      self.angle += dt * SPIN_SPEED;
    }
  }

  pub fn world(&self) -> Matrix4<f32> {
    Matrix4::from_angle_y(Rad(self.angle))
  }

  pub fn projection(&self) -> Matrix4<f32> {
    self.projection
  }
}

impl Default for Spin {
  fn default() -> Self {
    Self::new()
  }
}

pub struct LocalExample {
  program: Program<Semantics, (), ShaderInterface>,
  cube: Tess<CubeVertex, VertexIndex>,
  diffuse: RGBATexture,
  overlay: RGBATexture,
  normal_map: RGBATexture,
  view: Matrix4<f32>,
  spin: Spin,
}

impl Example for LocalExample {
  fn features() -> Features {
    Features::none()
      .texture(DIFFUSE_TEXTURE)
      .texture(OVERLAY_TEXTURE)
      .texture(NORMAL_TEXTURE)
  }

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    let diffuse = load_texture(context, platform, DIFFUSE_TEXTURE)?;
    let overlay = load_texture(context, platform, OVERLAY_TEXTURE)?;
    let normal_map = load_texture(context, platform, NORMAL_TEXTURE)?;

    let program = context
      .new_shader_program::<Semantics, (), ShaderInterface>()
      .from_strings(VS, None, None, FS)
      .map_err(|e| DemoError::CannotCreateProgram(Box::new(e)))?
      .ignore_warnings();

    let (vertices, indices) = cube();
    let cube = context
      .new_tess()
      .set_vertices(&vertices[..])
      .set_indices(&indices[..])
      .set_mode(Mode::Triangle)
      .build()
      .map_err(|e| DemoError::CannotCreateTess(Box::new(e)))?;

    let view = Matrix4::look_at_rh(
      Point3::from(CAMERA_POSITION),
      Point3::new(0., 0., 0.),
      Vector3::unit_y(),
    );

    Ok(LocalExample {
      program,
      cube,
      diffuse,
      overlay,
      normal_map,
      view,
      spin: Spin::new(),
    })
  }

  fn render_frame(
    mut self,
    t: f32,
    back_buffer: Framebuffer<Dim2, (), ()>,
    actions: impl Iterator<Item = InputAction>,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> LoopFeedback<Self> {
    for action in actions {
      if let LoopFeedback::Exit = self.spin.handle(&action) {
        return LoopFeedback::Exit;
      }
    }

    self.spin.advance(t);

    let world = Mat44::new(self.spin.world());
    let [lx, ly, lz] = LIGHT_POSITION;
    let [cx, cy, cz] = CAMERA_POSITION;
    let view = Mat44::new(self.view);
    let projection = Mat44::new(self.spin.projection());
    let program = &mut self.program;
    let cube = &self.cube;
    let diffuse = &mut self.diffuse;
    let overlay = &mut self.overlay;
    let normal_map = &mut self.normal_map;

    let render = context
      .new_pipeline_gate()
      .pipeline(
        &back_buffer,
        &PipelineState::default().set_clear_color(CLEAR_COLOR),
        |pipeline, mut shd_gate| {
          let bound_diffuse = pipeline.bind_texture(diffuse)?;
          let bound_overlay = pipeline.bind_texture(overlay)?;
          let bound_normal_map = pipeline.bind_texture(normal_map)?;

          shd_gate.shade(program, |mut iface, uni, mut rdr_gate| {
            iface.set(&uni.world, world);
            iface.set(&uni.view, view);
            iface.set(&uni.projection, projection);
            iface.set(&uni.light_position, Vec3::new(lx, ly, lz));
            iface.set(&uni.camera_position, Vec3::new(cx, cy, cz));
            iface.set(&uni.texture1, bound_diffuse.binding());
            iface.set(&uni.texture2, bound_overlay.binding());
            iface.set(&uni.texture1_normal, bound_normal_map.binding());

            rdr_gate.render(&RenderState::default(), |mut tess_gate| {
              tess_gate.render(cube)
            })
          })
        },
      )
      .assume();

    if render.is_ok() {
      LoopFeedback::Continue(self)
    } else {
      LoopFeedback::Exit
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn main_toggle_flips_spinning() {
    let mut spin = Spin::new();
    assert!(!spin.spinning);

    assert_eq!(spin.handle(&InputAction::MainToggle), LoopFeedback::Continue(()));
    assert!(spin.spinning);

    spin.handle(&InputAction::MainToggle);
    assert!(!spin.spinning);
  }

  #[test]
  fn angle_advances_only_while_spinning() {
    let mut spin = Spin::new();
    let start = spin.angle;

    spin.advance(0.);
    spin.advance(2.);
    assert_eq!(spin.angle, start);

    spin.handle(&InputAction::MainToggle);
    spin.advance(3.);
    assert!((spin.angle - (start + SPIN_SPEED)).abs() < 1e-5);

    spin.handle(&InputAction::MainToggle);
    spin.advance(10.);
    assert!((spin.angle - (start + SPIN_SPEED)).abs() < 1e-5);
  }

  #[test]
  fn resize_updates_projection_unless_minimized() {
    let mut spin = Spin::new();
    let initial = spin.projection();

    spin.handle(&InputAction::Resized {
      width: 800,
      height: 0,
    });
    assert_eq!(spin.projection(), initial);

    spin.handle(&InputAction::Resized {
      width: 800,
      height: 800,
    });
    assert_eq!(
      spin.projection(),
      perspective(Deg(FOVY_DEG), 1., Z_NEAR, Z_FAR)
    );
  }

  #[test]
  fn quit_exits() {
    assert_eq!(Spin::new().handle(&InputAction::Quit), LoopFeedback::Exit);
  }
}
