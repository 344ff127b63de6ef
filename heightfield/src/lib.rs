//! Regular grid meshes synthesized from heightmap images.
//!
//! This crate turns a greyscale image into a renderable surface: one vertex per pixel, displaced
//! vertically by the pixel value, and two triangles per cell of four neighbouring pixels. It does
//! no I/O during generation and knows nothing about GPUs; uploading the buffers is up to the
//! caller.
//!
//! ```no_run
//! use heightfield::HeightImage;
//!
//! let image = HeightImage::open("heightmap.png")?;
//! let mesh = heightfield::generate(&image, 100., 1.);
//!
//! assert_eq!(mesh.vertices.len(), image.pixel_count());
//! # Ok::<(), heightfield::HeightfieldError>(())
//! ```
//!
//! # Layout
//!
//! Vertices are row-major: the vertex at `(x, z)` has index `z * width + x`. The cell whose
//! top-left vertex is `v` is split into the triangles `(v, v + width, v + width + 1)` and
//! `(v, v + width + 1, v + 1)`, both counter-clockwise when looked at from above (+Y).
//!
//! # Normals
//!
//! Normals are not computed: every vertex gets [`mesh::UP`].

#![deny(missing_docs)]

pub mod error;
pub mod height_image;
pub mod mesh;

pub use error::HeightfieldError;
pub use height_image::HeightImage;
pub use mesh::{generate, GridMesh, GridVertex};
