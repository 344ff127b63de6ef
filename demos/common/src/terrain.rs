//! A terrain generated out of a heightmap, with a water plane and a sky, explored with a fly
//! camera.
//!
//! The heightmap is decoded once and used twice: its pixels displace a grid mesh on the CPU and it
//! is uploaded as a texture so that the fragment shader can compute normals out of it (the
//! generated mesh only has “up” normals). The water is a grid of the same size generated out of a
//! flat image, lifted at a fixed water level.
//!
//! Controls:
//!
//! - <forward>, <backward>, <left>, <right>, <up> and <down> actions to move.
//! - Hold the <primary action> and move the cursor to look around.
//! - Scroll to change the field of view.
//! - Press the <main action> to pause / resume the sun.
//! - Press the <auxiliary action> to hide / show the water.
//!
//! Required textures: `heightmap.png`, `grass.png`, `rock.png` and `snow.png`.
//!
//! <https://docs.rs/luminance>

use crate::{
  camera::FlyCamera,
  shared::{
    fetch_heightmap, load_texture, sky_cube, upload_grid, upload_heights, GridVertex,
    HeightTexture, RGBATexture, Semantics, SkyVertex, VertexIndex,
  },
  DemoError, Example, Features, InputAction, LoopFeedback, PlatformServices,
};
use cgmath::{InnerSpace as _, Matrix4, Vector3};
use heightfield::HeightImage;
use luminance::UniformInterface;
use luminance_front::{
  blending::{Blending, Equation, Factor},
  context::GraphicsContext,
  depth_stencil::Write,
  face_culling::{FaceCulling, FaceCullingMode, FaceCullingOrder},
  framebuffer::Framebuffer,
  pipeline::{PipelineState, TextureBinding},
  pixel::NormUnsigned,
  render_state::RenderState,
  shader::{
    types::{Mat44, Vec2, Vec3},
    Program, Uniform,
  },
  tess::{Mode, Tess},
  texture::Dim2,
  Backend,
};

const TERRAIN_VS: &str = include_str!("terrain-vs.glsl");
const TERRAIN_FS: &str = include_str!("terrain-fs.glsl");
const WATER_VS: &str = include_str!("water-vs.glsl");
const WATER_FS: &str = include_str!("water-fs.glsl");
const SKY_VS: &str = include_str!("sky-vs.glsl");
const SKY_FS: &str = include_str!("sky-fs.glsl");

const HEIGHTMAP: &str = "heightmap.png";
const GRASS_TEXTURE: &str = "grass.png";
const ROCK_TEXTURE: &str = "rock.png";
const SNOW_TEXTURE: &str = "snow.png";

// Terrain shape.
const HEIGHT_SCALE: f32 = 100.;
const HORIZONTAL_SCALE: f32 = 1.;
const WATER_LEVEL: f32 = 25.;
// How many times color textures repeat over the whole terrain.
const TEXTURE_TILING: f32 = 32.;

// Camera.
const CAMERA_FOVY_RAD: f32 = std::f32::consts::FRAC_PI_3;
const CAMERA_SPEED: f32 = 2.;
const Z_NEAR: f32 = 0.5;

// Sun, in radians per second around the vertical axis.
const SUN_SPEED: f32 = 0.05;
const SUN_ELEVATION: f32 = 0.6;

// Horizon color, shared by the sky and the fog.
const FOG_COLOR: [f32; 3] = [0.65, 0.75, 0.85];

#[derive(UniformInterface)]
struct TerrainShaderInterface {
  #[uniform(unbound)]
  world: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  view: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  projection: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  heightmap: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  #[uniform(unbound)]
  grass_tex: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  #[uniform(unbound)]
  rock_tex: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  #[uniform(unbound)]
  snow_tex: Uniform<TextureBinding<Dim2, NormUnsigned>>,
  #[uniform(unbound)]
  texel_size: Uniform<Vec2<f32>>,
  #[uniform(unbound)]
  height_scale: Uniform<f32>,
  #[uniform(unbound)]
  grid_spacing: Uniform<f32>,
  #[uniform(unbound)]
  tiling: Uniform<f32>,
  #[uniform(unbound)]
  light_direction: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  camera_position: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  fog_color: Uniform<Vec3<f32>>,
}

#[derive(UniformInterface)]
struct WaterShaderInterface {
  #[uniform(unbound)]
  world: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  view: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  projection: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  t: Uniform<f32>,
  #[uniform(unbound)]
  light_direction: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  camera_position: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  fog_color: Uniform<Vec3<f32>>,
}

#[derive(UniformInterface)]
struct SkyShaderInterface {
  #[uniform(unbound)]
  rotation: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  projection: Uniform<Mat44<f32>>,
  #[uniform(unbound)]
  light_direction: Uniform<Vec3<f32>>,
  #[uniform(unbound)]
  fog_color: Uniform<Vec3<f32>>,
}

/// Everything that changes from one frame to another.
#[derive(Clone, Debug)]
pub struct Scene {
  pub camera: FlyCamera,
  sun_angle: f32,
  sun_paused: bool,
  show_water: bool,
  last_t: Option<f32>,
}

impl Scene {
  pub fn new(camera: FlyCamera) -> Self {
    Scene {
      camera,
      sun_angle: 0.,
      sun_paused: false,
      show_water: true,
      last_t: None,
    }
  }

  /// Apply an input action; returns [`LoopFeedback::Exit`] when the demo should stop.
  pub fn handle(&mut self, action: &InputAction) -> LoopFeedback<()> {
    match action {
      InputAction::Quit => return LoopFeedback::Exit,

      InputAction::MainToggle => {
        self.sun_paused = !self.sun_paused;
        log::info!("sun paused: {}", self.sun_paused);
      }

      InputAction::AuxiliaryToggle => {
        self.show_water = !self.show_water;
        log::info!("water shown: {}", self.show_water);
      }

      InputAction::Resized { .. } => {
        self.camera.handle(action);
        log::debug!("aspect ratio is now {}", self.camera.aspect_ratio());
      }

      _ => {
        self.camera.handle(action);
      }
    }

    LoopFeedback::Continue(())
  }

  /// Move the scene forward to time `t`, in seconds.
  pub fn advance(&mut self, t: f32) {
    let dt = t - self.last_t.unwrap_or(t);
    self.last_t = Some(t);

    if !self.sun_paused {
      self.sun_angle = (self.sun_angle + dt * SUN_SPEED) % std::f32::consts::TAU;
    }
  }

  /// Unit direction in which the sun light travels.
  pub fn light_direction(&self) -> Vector3<f32> {
    let to_sun = Vector3::new(self.sun_angle.cos(), SUN_ELEVATION, self.sun_angle.sin());
    -to_sun.normalize()
  }

  pub fn show_water(&self) -> bool {
    self.show_water
  }
}

// GPU resources of the demo.
struct Resources {
  terrain_program: Program<Semantics, (), TerrainShaderInterface>,
  water_program: Program<Semantics, (), WaterShaderInterface>,
  sky_program: Program<Semantics, (), SkyShaderInterface>,
  terrain: Tess<GridVertex, VertexIndex>,
  water: Tess<GridVertex, VertexIndex>,
  sky: Tess<SkyVertex, VertexIndex>,
  heights: HeightTexture,
  grass: RGBATexture,
  rock: RGBATexture,
  snow: RGBATexture,
  // centers the terrain around the origin
  world: Matrix4<f32>,
  texel_size: [f32; 2],
}

pub struct LocalExample {
  scene: Scene,
  resources: Resources,
}

impl Example for LocalExample {
  fn features() -> Features {
    Features::none()
      .texture(HEIGHTMAP)
      .texture(GRASS_TEXTURE)
      .texture(ROCK_TEXTURE)
      .texture(SNOW_TEXTURE)
  }

  fn bootstrap(
    platform: &mut impl PlatformServices,
    context: &mut impl GraphicsContext<Backend = Backend>,
  ) -> Result<Self, DemoError> {
    let heightmap = fetch_heightmap(platform, HEIGHTMAP)?;
    let (width, height) = (heightmap.width(), heightmap.height());
    log::info!(
      "heightmap is {}×{} ({} channel(s))",
      width,
      height,
      heightmap.channels()
    );

    let heights = upload_heights(context, &heightmap)?;
    let terrain = upload_grid(
      context,
      heightfield::generate(&heightmap, HEIGHT_SCALE, HORIZONTAL_SCALE),
    )?;
    let water = upload_grid(
      context,
      heightfield::generate(&HeightImage::flat(width, height)?, 0., HORIZONTAL_SCALE),
    )?;

    let grass = load_texture(context, platform, GRASS_TEXTURE)?;
    let rock = load_texture(context, platform, ROCK_TEXTURE)?;
    let snow = load_texture(context, platform, SNOW_TEXTURE)?;

    let terrain_program = context
      .new_shader_program::<Semantics, (), TerrainShaderInterface>()
      .from_strings(TERRAIN_VS, None, None, TERRAIN_FS)
      .map_err(|e| DemoError::CannotCreateProgram(Box::new(e)))?
      .ignore_warnings();

    let water_program = context
      .new_shader_program::<Semantics, (), WaterShaderInterface>()
      .from_strings(WATER_VS, None, None, WATER_FS)
      .map_err(|e| DemoError::CannotCreateProgram(Box::new(e)))?
      .ignore_warnings();

    let sky_program = context
      .new_shader_program::<Semantics, (), SkyShaderInterface>()
      .from_strings(SKY_VS, None, None, SKY_FS)
      .map_err(|e| DemoError::CannotCreateProgram(Box::new(e)))?
      .ignore_warnings();

    let (sky_vertices, sky_indices) = sky_cube(1.);
    let sky = context
      .new_tess()
      .set_vertices(&sky_vertices[..])
      .set_indices(&sky_indices[..])
      .set_mode(Mode::Triangle)
      .build()
      .map_err(|e| DemoError::CannotCreateTess(Box::new(e)))?;

    let extent = [
      width as f32 * HORIZONTAL_SCALE,
      height as f32 * HORIZONTAL_SCALE,
    ];
    let world = Matrix4::from_translation(Vector3::new(-extent[0] * 0.5, 0., -extent[1] * 0.5));

    // start above the southern edge, looking at the center of the terrain
    let z_far = extent[0].max(extent[1]) * 2. + HEIGHT_SCALE;
    let camera = FlyCamera::new(
      Vector3::new(0., HEIGHT_SCALE, extent[1] * 0.5),
      CAMERA_FOVY_RAD,
      16. / 9.,
      Z_NEAR,
      z_far,
    )
    .with_speed(CAMERA_SPEED)
    .look_at(Vector3::new(0., 0., 0.));
    log::debug!(
      "camera at {:?}, looking along {:?}, fovy {} rad",
      camera.eye(),
      camera.forward(),
      camera.fovy()
    );

    let resources = Resources {
      terrain_program,
      water_program,
      sky_program,
      terrain,
      water,
      sky,
      heights,
      grass,
      rock,
      snow,
      world,
      texel_size: [1. / width.max(1) as f32, 1. / height.max(1) as f32],
    };

    Ok(LocalExample {
      scene: Scene::new(camera),
      resources,
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
      if let LoopFeedback::Exit = self.scene.handle(&action) {
        return LoopFeedback::Exit;
      }
    }

    self.scene.advance(t);

    if render(&mut self.resources, &self.scene, t, back_buffer, context) {
      LoopFeedback::Continue(self)
    } else {
      LoopFeedback::Exit
    }
  }
}

fn vec3(v: Vector3<f32>) -> Vec3<f32> {
  Vec3::new(v.x, v.y, v.z)
}

// Render the sky, then the terrain, then the (transparent) water.
fn render(
  resources: &mut Resources,
  scene: &Scene,
  t: f32,
  back_buffer: Framebuffer<Dim2, (), ()>,
  context: &mut impl GraphicsContext<Backend = Backend>,
) -> bool {
  let camera = &scene.camera;
  let projection = camera.projection();
  let view = camera.view();
  let rotation = camera.rotation();
  let eye = camera.eye();
  let light_direction = scene.light_direction();
  let show_water = scene.show_water();
  let [fog_r, fog_g, fog_b] = FOG_COLOR;
  let fog_color = Vec3::new(fog_r, fog_g, fog_b);
  let [texel_w, texel_h] = resources.texel_size;
  let world = resources.world;
  let water_world = Matrix4::from_translation(Vector3::new(0., WATER_LEVEL, 0.)) * world;

  let Resources {
    ref mut terrain_program,
    ref mut water_program,
    ref mut sky_program,
    ref terrain,
    ref water,
    ref sky,
    ref mut heights,
    ref mut grass,
    ref mut rock,
    ref mut snow,
    ..
  } = *resources;

  // the sky is drawn around the camera, behind everything else
  let sky_st = RenderState::default()
    .set_depth_test(None)
    .set_depth_write(Write::Off);
  let terrain_st = RenderState::default().set_face_culling(FaceCulling::new(
    FaceCullingOrder::CCW,
    FaceCullingMode::Back,
  ));
  let water_st = RenderState::default().set_blending(Blending {
    equation: Equation::Additive,
    src: Factor::SrcAlpha,
    dst: Factor::SrcAlphaComplement,
  });

  let render = context
    .new_pipeline_gate()
    .pipeline(
      &back_buffer,
      &PipelineState::default().set_clear_color([fog_r, fog_g, fog_b, 1.]),
      |pipeline, mut shd_gate| {
        let bound_heights = pipeline.bind_texture(heights)?;
        let bound_grass = pipeline.bind_texture(grass)?;
        let bound_rock = pipeline.bind_texture(rock)?;
        let bound_snow = pipeline.bind_texture(snow)?;

        shd_gate.shade(sky_program, |mut iface, uni, mut rdr_gate| {
          iface.set(&uni.rotation, Mat44::new(rotation));
          iface.set(&uni.projection, Mat44::new(projection));
          iface.set(&uni.light_direction, vec3(light_direction));
          iface.set(&uni.fog_color, fog_color);

          rdr_gate.render(&sky_st, |mut tess_gate| tess_gate.render(sky))
        })?;

        shd_gate.shade(terrain_program, |mut iface, uni, mut rdr_gate| {
          iface.set(&uni.world, Mat44::new(world));
          iface.set(&uni.view, Mat44::new(view));
          iface.set(&uni.projection, Mat44::new(projection));
          iface.set(&uni.heightmap, bound_heights.binding());
          iface.set(&uni.grass_tex, bound_grass.binding());
          iface.set(&uni.rock_tex, bound_rock.binding());
          iface.set(&uni.snow_tex, bound_snow.binding());
          iface.set(&uni.texel_size, Vec2::new(texel_w, texel_h));
          iface.set(&uni.height_scale, HEIGHT_SCALE);
          iface.set(&uni.grid_spacing, HORIZONTAL_SCALE);
          iface.set(&uni.tiling, TEXTURE_TILING);
          iface.set(&uni.light_direction, vec3(light_direction));
          iface.set(&uni.camera_position, vec3(eye));
          iface.set(&uni.fog_color, fog_color);

          rdr_gate.render(&terrain_st, |mut tess_gate| tess_gate.render(terrain))
        })?;

        if !show_water {
          return Ok(());
        }

        shd_gate.shade(water_program, |mut iface, uni, mut rdr_gate| {
          iface.set(&uni.world, Mat44::new(water_world));
          iface.set(&uni.view, Mat44::new(view));
          iface.set(&uni.projection, Mat44::new(projection));
          iface.set(&uni.t, t);
          iface.set(&uni.light_direction, vec3(light_direction));
          iface.set(&uni.camera_position, vec3(eye));
          iface.set(&uni.fog_color, fog_color);

          rdr_gate.render(&water_st, |mut tess_gate| tess_gate.render(water))
        })
      },
    )
    .assume();

  render.is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scene() -> Scene {
    Scene::new(FlyCamera::new(Vector3::new(0., 10., 0.), 1., 1., 0.1, 100.))
  }

  #[test]
  fn light_comes_from_above() {
    let mut scene = scene();

    for i in 0..100 {
      scene.advance(i as f32 * 10.);
      let dir = scene.light_direction();

      assert!((dir.magnitude() - 1.).abs() < 1e-5);
      assert!(dir.y < 0.);
    }
  }

  #[test]
  fn sun_moves_unless_paused() {
    let mut scene = scene();
    scene.advance(0.);
    let start = scene.light_direction();

    scene.advance(5.);
    let moved = scene.light_direction();
    assert!((moved - start).magnitude() > 1e-4);

    scene.handle(&InputAction::MainToggle);
    scene.advance(10.);
    assert_eq!(scene.light_direction(), moved);

    scene.handle(&InputAction::MainToggle);
    scene.advance(15.);
    assert_ne!(scene.light_direction(), moved);
  }

  #[test]
  fn auxiliary_toggles_water() {
    let mut scene = scene();
    assert!(scene.show_water());

    scene.handle(&InputAction::AuxiliaryToggle);
    assert!(!scene.show_water());

    scene.handle(&InputAction::AuxiliaryToggle);
    assert!(scene.show_water());
  }

  #[test]
  fn movement_goes_to_the_camera() {
    let mut scene = scene();
    let before = scene.camera.eye();

    assert_eq!(
      scene.handle(&InputAction::Forward),
      LoopFeedback::Continue(())
    );
    assert_ne!(scene.camera.eye(), before);
  }

  #[test]
  fn quit_exits() {
    assert_eq!(scene().handle(&InputAction::Quit), LoopFeedback::Exit);
  }
}
