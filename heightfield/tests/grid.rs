use heightfield::{generate, mesh::UP, HeightImage};

fn gradient(width: u32, height: u32) -> HeightImage {
  let samples = (0..width * height).map(|i| (i * 7 % 256) as u8).collect();
  HeightImage::new(width, height, 1, samples).unwrap()
}

fn approx_eq(a: f32, b: f32) -> bool {
  (a - b).abs() <= 1e-5 * a.abs().max(b.abs()).max(1.)
}

#[test]
fn vertex_and_index_counts() {
  for &(w, h) in &[(2, 2), (2, 7), (7, 2), (5, 5), (16, 9), (33, 17)] {
    let mesh = generate(&gradient(w, h), 10., 1.);

    assert_eq!(mesh.vertices.len(), (w * h) as usize);
    assert_eq!(mesh.indices.len(), ((w - 1) * (h - 1) * 6) as usize);
    assert_eq!(mesh.triangle_count(), ((w - 1) * (h - 1) * 2) as usize);
    assert_eq!((mesh.width(), mesh.height()), (w, h));
  }
}

#[test]
fn uvs_follow_grid_position() {
  let (w, h) = (6, 4);
  let mesh = generate(&gradient(w, h), 1., 3.);

  for z in 0..h {
    for x in 0..w {
      let v = &mesh.vertices[(z * w + x) as usize];
      assert_eq!(v.uv, [x as f32 / w as f32, z as f32 / h as f32]);
    }
  }
}

#[test]
fn positions_are_row_major_and_scaled() {
  let (w, h) = (4, 3);
  let mesh = generate(&gradient(w, h), 1., 2.5);

  for z in 0..h {
    for x in 0..w {
      let v = &mesh.vertices[(z * w + x) as usize];
      assert_eq!(v.position[0], x as f32 * 2.5);
      assert_eq!(v.position[2], z as f32 * 2.5);
    }
  }
}

#[test]
fn normals_point_up() {
  let mesh = generate(&gradient(8, 8), 50., 1.);
  assert!(mesh.vertices.iter().all(|v| v.normal == UP));
}

#[test]
fn indices_stay_in_range() {
  let (w, h) = (13, 11);
  let mesh = generate(&gradient(w, h), 1., 1.);

  assert!(mesh.indices.iter().all(|&i| i < w * h));
}

#[test]
fn last_row_and_column_start_no_cell() {
  let (w, h) = (5, 4);
  let mesh = generate(&gradient(w, h), 1., 1.);

  for quad in mesh.indices.chunks_exact(6) {
    let v = quad[0];
    assert_ne!(v % w, w - 1);
    assert_ne!(v / w, h - 1);
  }
}

#[test]
fn height_scale_is_linear() {
  let image = gradient(9, 9);
  let single = generate(&image, 3., 1.);
  let double = generate(&image, 6., 1.);

  for (a, b) in single.vertices.iter().zip(&double.vertices) {
    assert!(approx_eq(a.position[1] * 2., b.position[1]));
    assert_eq!(a.position[0], b.position[0]);
    assert_eq!(a.position[2], b.position[2]);
  }
  assert_eq!(single.indices, double.indices);
}

#[test]
fn two_by_two_is_a_single_cell() {
  let image = HeightImage::new(2, 2, 1, vec![0, 0, 0, 0]).unwrap();
  let mesh = generate(&image, 1., 1.);

  assert_eq!(mesh.vertices.len(), 4);
  assert_eq!(mesh.indices, vec![0, 2, 3, 0, 3, 1]);
  assert_eq!(mesh.triangles().collect::<Vec<_>>(), vec![[0, 2, 3], [0, 3, 1]]);
}

#[test]
fn three_by_three_elevation() {
  let samples = vec![0, 128, 255, 64, 192, 32, 10, 250, 0];
  let image = HeightImage::new(3, 3, 1, samples).unwrap();
  let mesh = generate(&image, 10., 1.);

  let [x, y, z] = mesh.vertices[4].position;
  assert_eq!(x, 1.);
  assert_eq!(z, 1.);
  assert!(approx_eq(y, 192. / 255. * 10.));
  assert!((y - 7.529).abs() < 1e-3);

  assert_eq!(mesh.vertices[0].position[1], 0.);
  assert!(approx_eq(mesh.vertices[2].position[1], 10.));
}

#[test]
fn only_first_channel_is_elevation() {
  // RGB pixels whose green and blue channels would give very different heights
  let samples = vec![
    10, 200, 90, //
    20, 0, 255, //
    30, 255, 0, //
    40, 1, 2,
  ];
  let rgb = HeightImage::new(2, 2, 3, samples).unwrap();
  let luma = HeightImage::new(2, 2, 1, vec![10, 20, 30, 40]).unwrap();

  assert_eq!(generate(&rgb, 25., 0.5), generate(&luma, 25., 0.5));
}

#[test]
fn generation_is_deterministic() {
  let image = gradient(17, 23);
  let a = generate(&image, 12.5, 0.75);
  let b = generate(&image, 12.5, 0.75);

  let bits = |m: &heightfield::GridMesh| {
    m.vertices
      .iter()
      .flat_map(|v| v.position.iter().chain(&v.normal).chain(&v.uv))
      .map(|f| f.to_bits())
      .collect::<Vec<_>>()
  };

  assert_eq!(bits(&a), bits(&b));
  assert_eq!(a.indices, b.indices);
}

#[test]
fn thin_images_have_vertices_but_no_triangles() {
  for &(w, h) in &[(1, 1), (1, 6), (6, 1)] {
    let mesh = generate(&gradient(w, h), 1., 1.);

    assert_eq!(mesh.vertices.len(), (w * h) as usize);
    assert!(mesh.indices.is_empty());
  }

  let empty = generate(&HeightImage::flat(0, 0).unwrap(), 1., 1.);
  assert!(empty.vertices.is_empty());
  assert!(empty.indices.is_empty());
}

#[test]
fn triangles_face_up() {
  let mesh = generate(&HeightImage::flat(6, 5).unwrap(), 1., 1.);

  for [a, b, c] in mesh.triangles() {
    let [a, b, c] = [a, b, c].map(|i| mesh.vertices[i as usize].position);
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    // y component of e1 × e2
    let ny = e1[2] * e2[0] - e1[0] * e2[2];

    assert!(ny > 0., "triangle {:?} is clockwise from above", [a, b, c]);
  }
}

#[test]
fn flat_image_is_flat() {
  let mesh = generate(&HeightImage::flat(4, 4).unwrap(), 100., 1.);
  assert!(mesh.vertices.iter().all(|v| v.position[1] == 0.));
}
