use heightfield::{GridMesh, HeightImage};
use luminance::{Semantics, Vertex};
use luminance_front::{
  context::GraphicsContext,
  pixel::{NormR8UI, NormRGBA8UI},
  tess::{Mode, Tess},
  texture::{Dim2, MagFilter, MinFilter, Sampler, TexelUpload, Texture, Wrap},
  Backend,
};

use crate::{DemoError, PlatformServices};

// number of mipmaps generated for color textures
const MIPMAPS: usize = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Semantics)]
pub enum Semantics {
  // reference vertex positions with the co3 variable in vertex shaders
  #[sem(name = "co3", repr = "[f32; 3]", wrapper = "VertexPosition3")]
  Position3,
  // reference vertex colors with the color variable in vertex shaders
  #[sem(name = "color", repr = "[f32; 3]", wrapper = "VertexColor")]
  Color,
  // reference texture coordinates with the uv variable in vertex shaders
  #[sem(name = "uv", repr = "[f32; 2]", wrapper = "VertexUV")]
  UV,
  // reference vertex normals with the nor variable in vertex shaders
  #[sem(name = "nor", repr = "[f32; 3]", wrapper = "VertexNormal")]
  Normal,
  #[sem(name = "tangent", repr = "[f32; 3]", wrapper = "VertexTangent")]
  Tangent,
  #[sem(name = "bitangent", repr = "[f32; 3]", wrapper = "VertexBitangent")]
  Bitangent,
}

// A vertex carrying a full tangent space, for normal mapping.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Vertex)]
#[vertex(sem = "Semantics")]
pub struct CubeVertex {
  pub pos: VertexPosition3,
  pub rgb: VertexColor,
  pub uv: VertexUV,
  pub nor: VertexNormal,
  pub tangent: VertexTangent,
  pub bitangent: VertexBitangent,
}

// GPU side of heightfield::GridVertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Vertex)]
#[vertex(sem = "Semantics")]
pub struct GridVertex {
  pub pos: VertexPosition3,
  pub nor: VertexNormal,
  pub uv: VertexUV,
}

impl From<heightfield::GridVertex> for GridVertex {
  fn from(v: heightfield::GridVertex) -> Self {
    GridVertex::new(v.position.into(), v.normal.into(), v.uv.into())
  }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Vertex)]
#[vertex(sem = "Semantics")]
pub struct SkyVertex {
  pub pos: VertexPosition3,
}

pub type VertexIndex = u32;

// Unit cube with 24 vertices so that each face gets its own UVs and tangent space.
#[rustfmt::skip]
pub fn cube() -> ([CubeVertex; 24], [VertexIndex; 36]) {
  let v = |pos: [f32; 3], uv: [f32; 2], nor: [f32; 3], tangent: [f32; 3], bitangent: [f32; 3]| {
    CubeVertex::new(
      pos.into(),
      [1., 1., 1.].into(),
      uv.into(),
      nor.into(),
      tangent.into(),
      bitangent.into(),
    )
  };

  let vertices = [
    v([ 0.5, -0.5, -0.5], [1., 1.], [ 0., -1.,  0.], [-1.,  0., 0.], [0.,  0., 1.]),
    v([ 0.5, -0.5,  0.5], [1., 0.], [ 0., -1.,  0.], [-1.,  0., 0.], [0.,  0., 1.]),
    v([-0.5, -0.5,  0.5], [0., 0.], [ 0., -1.,  0.], [-1.,  0., 0.], [0.,  0., 1.]),
    v([-0.5, -0.5, -0.5], [0., 1.], [ 0., -1.,  0.], [-1.,  0., 0.], [0.,  0., 1.]),

    v([ 0.5,  0.5, -0.5], [1., 1.], [ 1.,  0.,  0.], [ 0., -1., 0.], [0.,  0., 1.]),
    v([ 0.5,  0.5,  0.5], [1., 0.], [ 1.,  0.,  0.], [ 0., -1., 0.], [0.,  0., 1.]),

    v([ 0.5,  0.5,  0.5], [1., 0.], [ 0.,  0.,  1.], [ 1.,  0., 0.], [0., -1., 0.]),
    v([-0.5,  0.5,  0.5], [0., 0.], [ 0.,  0.,  1.], [ 1.,  0., 0.], [0., -1., 0.]),

    v([-0.5,  0.5,  0.5], [0., 0.], [-1.,  0.,  0.], [ 0.,  1., 0.], [0.,  0., 1.]),
    v([-0.5,  0.5, -0.5], [0., 1.], [-1.,  0.,  0.], [ 0.,  1., 0.], [0.,  0., 1.]),

    v([-0.5,  0.5, -0.5], [0., 1.], [ 0.,  0., -1.], [ 1.,  0., 0.], [0.,  1., 0.]),
    v([ 0.5,  0.5, -0.5], [1., 1.], [ 0.,  0., -1.], [ 1.,  0., 0.], [0.,  1., 0.]),

    v([-0.5,  0.5, -0.5], [1., 1.], [ 0.,  1.,  0.], [ 1.,  0., 0.], [0.,  0., 1.]),
    v([-0.5,  0.5,  0.5], [1., 0.], [ 0.,  1.,  0.], [ 1.,  0., 0.], [0.,  0., 1.]),

    v([ 0.5, -0.5,  0.5], [1., 1.], [ 0.,  0.,  1.], [ 1.,  0., 0.], [0., -1., 0.]),
    v([-0.5, -0.5,  0.5], [0., 1.], [ 0.,  0.,  1.], [ 1.,  0., 0.], [0., -1., 0.]),

    v([-0.5, -0.5,  0.5], [1., 0.], [-1.,  0.,  0.], [ 0.,  1., 0.], [0.,  0., 1.]),
    v([-0.5, -0.5, -0.5], [1., 1.], [-1.,  0.,  0.], [ 0.,  1., 0.], [0.,  0., 1.]),

    v([-0.5, -0.5, -0.5], [0., 0.], [ 0.,  0., -1.], [ 1.,  0., 0.], [0.,  1., 0.]),
    v([ 0.5, -0.5, -0.5], [1., 0.], [ 0.,  0., -1.], [ 1.,  0., 0.], [0.,  1., 0.]),

    v([ 0.5, -0.5, -0.5], [0., 1.], [ 1.,  0.,  0.], [ 0., -1., 0.], [0.,  0., 1.]),
    v([ 0.5, -0.5,  0.5], [0., 0.], [ 1.,  0.,  0.], [ 0., -1., 0.], [0.,  0., 1.]),

    v([ 0.5,  0.5, -0.5], [0., 1.], [ 0.,  1.,  0.], [ 1.,  0., 0.], [0.,  0., 1.]),
    v([ 0.5,  0.5,  0.5], [0., 0.], [ 0.,  1.,  0.], [ 1.,  0., 0.], [0.,  0., 1.]),
  ];

  let indices = [
    // down
    0, 1, 2,    0, 2, 3,
    // back
    14, 6, 7,   14, 7, 15,
    // right
    20, 4, 5,   20, 5, 21,
    // left
    16, 8, 9,   16, 9, 17,
    // front
    18, 10, 11, 18, 11, 19,
    // up
    22, 12, 13, 22, 13, 23,
  ];

  (vertices, indices)
}

// Positions of a cube of the given half extent, as a triangle list seen from the inside.
#[rustfmt::skip]
pub fn sky_cube(s: f32) -> ([SkyVertex; 8], [VertexIndex; 36]) {
  let vertices = [
    SkyVertex::new([-s, -s, -s].into()),
    SkyVertex::new([ s, -s, -s].into()),
    SkyVertex::new([ s,  s, -s].into()),
    SkyVertex::new([-s,  s, -s].into()),
    SkyVertex::new([-s, -s,  s].into()),
    SkyVertex::new([ s, -s,  s].into()),
    SkyVertex::new([ s,  s,  s].into()),
    SkyVertex::new([-s,  s,  s].into()),
  ];

  let indices = [
    0, 1, 2, 0, 2, 3, // -z
    5, 4, 7, 5, 7, 6, // +z
    4, 0, 3, 4, 3, 7, // -x
    1, 5, 6, 1, 6, 2, // +x
    3, 2, 6, 3, 6, 7, // +y
    4, 5, 1, 4, 1, 0, // -y
  ];

  (vertices, indices)
}

/// RGBA texture.
pub type RGBATexture = Texture<Dim2, NormRGBA8UI>;

/// Single-channel texture holding heights.
pub type HeightTexture = Texture<Dim2, NormR8UI>;

// Sampler used for color textures; they’re tiled over the terrain.
fn tiling_sampler() -> Sampler {
  Sampler {
    wrap_s: Wrap::Repeat,
    wrap_t: Wrap::Repeat,
    min_filter: MinFilter::LinearMipmapLinear,
    mag_filter: MagFilter::Linear,
    ..Sampler::default()
  }
}

pub fn load_texture(
  context: &mut impl GraphicsContext<Backend = Backend>,
  platform: &mut impl PlatformServices,
  name: &str,
) -> Result<RGBATexture, DemoError> {
  let img = platform
    .fetch_texture(name)
    .map_err(|e| DemoError::CannotFetchTexture(name.to_owned(), Box::new(e)))?
    .to_rgba8();
  let (width, height) = img.dimensions();
  let texels = img.as_raw();

  // texels are uploaded top row first, so that v = 0 maps to the top of the image like the grid
  // UVs do
  context
    .new_texture_raw(
      [width, height],
      tiling_sampler(),
      TexelUpload::base_level(texels, MIPMAPS),
    )
    .map_err(|e| DemoError::CannotCreateTexture(Box::new(e)))
}

// Decode a heightmap texture fetched from the platform.
pub fn fetch_heightmap(
  platform: &mut impl PlatformServices,
  name: &str,
) -> Result<HeightImage, DemoError> {
  let img = platform
    .fetch_texture(name)
    .map_err(|e| DemoError::CannotFetchTexture(name.to_owned(), Box::new(e)))?;

  Ok(HeightImage::from_dynamic(img)?)
}

// Upload the elevation channel of a height image so that shaders can sample it.
pub fn upload_heights(
  context: &mut impl GraphicsContext<Backend = Backend>,
  image: &HeightImage,
) -> Result<HeightTexture, DemoError> {
  let heights = height_texels(image);

  // a single level: heights are sampled texel-exact for normals, never minified
  context
    .new_texture_raw(
      [image.width(), image.height()],
      Sampler {
        min_filter: MinFilter::Linear,
        ..Sampler::default()
      },
      TexelUpload::base_level(&heights, 0),
    )
    .map_err(|e| DemoError::CannotCreateTexture(Box::new(e)))
}

// Channel 0 of every pixel, row-major.
fn height_texels(image: &HeightImage) -> Vec<u8> {
  image
    .samples()
    .iter()
    .step_by(image.channels() as usize)
    .copied()
    .collect()
}

pub fn upload_grid(
  context: &mut impl GraphicsContext<Backend = Backend>,
  mesh: GridMesh,
) -> Result<Tess<GridVertex, VertexIndex>, DemoError> {
  let vertices = mesh
    .vertices
    .into_iter()
    .map(GridVertex::from)
    .collect::<Vec<_>>();

  context
    .new_tess()
    .set_vertices(vertices)
    .set_indices(mesh.indices)
    .set_mode(Mode::Triangle)
    .build()
    .map_err(|e| DemoError::CannotCreateTess(Box::new(e)))
}
