//! Grid mesh synthesis.

use crate::height_image::HeightImage;

/// Largest value a height sample can take.
const MAX_SAMPLE: f32 = 255.;

/// Normal assigned to every generated vertex.
pub const UP: [f32; 3] = [0., 1., 0.];

/// A single vertex of a generated grid.
///
/// The normal is always [`UP`]: it is not derived from neighbouring heights. Renderers wanting
/// proper lighting on steep terrain must compute normals on their own, e.g. by sampling the height
/// image as a texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridVertex {
  /// World-space position.
  pub position: [f32; 3],
  /// Always [`UP`].
  pub normal: [f32; 3],
  /// `(x / width, z / height)`.
  pub uv: [f32; 2],
}

/// Owned vertex and index buffers of a grid surface.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMesh {
  /// Row-major vertices: the vertex at `(x, z)` lives at `z * width + x`.
  pub vertices: Vec<GridVertex>,
  /// Triangle list, two triangles per grid cell.
  pub indices: Vec<u32>,
  width: u32,
  height: u32,
}

impl GridMesh {
  /// Number of vertices per row.
  pub fn width(&self) -> u32 {
    self.width
  }

  /// Number of rows.
  pub fn height(&self) -> u32 {
    self.height
  }

  /// Number of triangles in the index buffer.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Iterate over the triangles of the mesh.
  pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
    self
      .indices
      .chunks_exact(3)
      .map(|tri| [tri[0], tri[1], tri[2]])
  }
}

/// Generate a grid mesh out of a height image.
///
/// Every pixel becomes a vertex at `(x * horizontal_scale, s / 255 * height_scale, z *
/// horizontal_scale)`, where `s` is the first channel of the pixel. Every cell of four
/// neighbouring pixels becomes two triangles, counter-clockwise when seen from above.
///
/// Images thinner than two pixels in either direction produce vertices but no triangles. Indices
/// are `u32`, which [`HeightImage`] guarantees by refusing images of more than `u32::MAX` pixels.
pub fn generate(image: &HeightImage, height_scale: f32, horizontal_scale: f32) -> GridMesh {
  let width = image.width();
  let height = image.height();

  let vertices = vertices(image, height_scale, horizontal_scale);
  let indices = indices(width, height);

  log::debug!(
    "generated {}×{} grid: {} vertices, {} triangles",
    width,
    height,
    vertices.len(),
    indices.len() / 3
  );

  GridMesh {
    vertices,
    indices,
    width,
    height,
  }
}

fn vertices(image: &HeightImage, height_scale: f32, horizontal_scale: f32) -> Vec<GridVertex> {
  let width = image.width() as usize;
  let (w, h) = (image.width() as f32, image.height() as f32);

  image
    .samples()
    .iter()
    .step_by(image.channels() as usize)
    .enumerate()
    .map(|(i, &sample)| {
      let x = (i % width) as f32;
      let z = (i / width) as f32;

      GridVertex {
        position: [
          x * horizontal_scale,
          f32::from(sample) / MAX_SAMPLE * height_scale,
          z * horizontal_scale,
        ],
        normal: UP,
        uv: [x / w, z / h],
      }
    })
    .collect()
}

fn indices(width: u32, height: u32) -> Vec<u32> {
  let cells_x = width.saturating_sub(1);
  let cells_z = height.saturating_sub(1);

  (0..cells_z)
    .flat_map(|z| (0..cells_x).map(move |x| z * width + x))
    .flat_map(|v| quad(v, width))
    .collect()
}

// Two triangles covering the cell whose top-left vertex is v.
fn quad(v: u32, width: u32) -> [u32; 6] {
  [v, v + width, v + width + 1, v, v + width + 1, v + 1]
}
