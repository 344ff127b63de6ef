//! A “FPS-style” fly camera.
//!
//! The camera is driven by [`InputAction`]s: directional actions strafe it around (relative to
//! where it looks), dragging the cursor while the primary action is held rotates it and scrolling
//! changes the field of view. It doesn’t need a GPU, so it can be used (and tested) on its own.

use cgmath::{
  perspective, Deg, InnerSpace as _, Matrix4, Quaternion, Rad, Rotation as _, Rotation3 as _,
  Vector3,
};

use crate::InputAction;

// Radians per pixel of cursor movement.
const SENSITIVITY_YAW: f32 = 0.003;
const SENSITIVITY_PITCH: f32 = 0.003;
// Radians per scroll step.
const SENSITIVITY_FOVY_CHANGE: f32 = 0.05;

/// Camera flying freely in the scene.
#[derive(Clone, Debug)]
pub struct FlyCamera {
  eye: Vector3<f32>,
  yaw: f32,
  pitch: f32,
  fovy: f32,
  aspect_ratio: f32,
  z_near: f32,
  z_far: f32,
  speed: f32,
  rotating: bool,
  last_cursor_pos: Option<[f32; 2]>,
  orient: Quaternion<f32>,
  view: Matrix4<f32>,
  projection: Matrix4<f32>,
}

impl FlyCamera {
  /// Create a camera at `eye`, looking towards -Z.
  ///
  /// `fovy` is the vertical field of view, in radians.
  pub fn new(eye: Vector3<f32>, fovy: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
    let fovy = clamp_fovy(fovy);
    let mut camera = FlyCamera {
      eye,
      yaw: 0.,
      pitch: 0.,
      fovy,
      aspect_ratio,
      z_near,
      z_far,
      speed: 1.,
      rotating: false,
      last_cursor_pos: None,
      orient: Quaternion::from_angle_y(Rad(0.)),
      view: Matrix4::from_translation(-eye),
      projection: perspective(Rad(fovy), aspect_ratio, z_near, z_far),
    };

    camera.update_view();
    camera
  }

  /// Distance travelled per directional action.
  pub fn with_speed(mut self, speed: f32) -> Self {
    self.speed = speed;
    self
  }

  /// Orient the camera towards `target`.
  pub fn look_at(mut self, target: Vector3<f32>) -> Self {
    let dir = target - self.eye;

    if dir.magnitude2() > 0. {
      let dir = dir.normalize();
      self.pitch = clamp_pitch(-dir.y.asin());
      self.yaw = dir.x.atan2(-dir.z);
      self.update_view();
    }

    self
  }

  /// React to an input action.
  ///
  /// Returns `true` if the action was relevant to the camera.
  pub fn handle(&mut self, action: &InputAction) -> bool {
    match *action {
      InputAction::Forward => self.strafe(Vector3::new(0., 0., -1.)),
      InputAction::Backward => self.strafe(Vector3::new(0., 0., 1.)),
      InputAction::Left => self.strafe(Vector3::new(-1., 0., 0.)),
      InputAction::Right => self.strafe(Vector3::new(1., 0., 0.)),
      InputAction::Up => self.strafe(Vector3::new(0., 1., 0.)),
      InputAction::Down => self.strafe(Vector3::new(0., -1., 0.)),

      InputAction::PrimaryPressed => self.rotating = true,
      InputAction::PrimaryReleased => self.rotating = false,

      // when the cursor moves, we need to update the last cursor position we know and, if needed,
      // update the Euler angles we use to orient the camera in space
      InputAction::CursorMoved { x, y } => {
        let [px, py] = self.last_cursor_pos.unwrap_or([x, y]);
        self.last_cursor_pos = Some([x, y]);

        if self.rotating {
          self.pitch = clamp_pitch(self.pitch + SENSITIVITY_PITCH * (y - py));
          self.yaw += SENSITIVITY_YAW * (x - px);
          self.update_view();
        }
      }

      InputAction::VScroll { amount } => {
        self.fovy = clamp_fovy(self.fovy - amount * SENSITIVITY_FOVY_CHANGE);
        self.update_projection();

        let Deg(deg) = Rad(self.fovy).into();
        log::debug!("new fovy is {}°", deg);
      }

      InputAction::Resized { width, height } => {
        // minimized windows report a zero height
        if height == 0 {
          return true;
        }

        self.aspect_ratio = width as f32 / height as f32;
        self.update_projection();
      }

      _ => return false,
    }

    true
  }

  /// Position of the camera.
  pub fn eye(&self) -> Vector3<f32> {
    self.eye
  }

  /// Unit vector the camera looks along.
  pub fn forward(&self) -> Vector3<f32> {
    self.orient.invert().rotate_vector(Vector3::new(0., 0., -1.))
  }

  pub fn view(&self) -> Matrix4<f32> {
    self.view
  }

  /// View matrix without the translation part; useful for skies.
  pub fn rotation(&self) -> Matrix4<f32> {
    Matrix4::from(self.orient)
  }

  pub fn projection(&self) -> Matrix4<f32> {
    self.projection
  }

  /// Vertical field of view, in radians.
  pub fn fovy(&self) -> f32 {
    self.fovy
  }

  pub fn aspect_ratio(&self) -> f32 {
    self.aspect_ratio
  }

  // move along a camera-space direction
  fn strafe(&mut self, dir: Vector3<f32>) {
    self.eye += self.orient.invert().rotate_vector(dir * self.speed);
    self.update_view();
  }

  fn update_view(&mut self) {
    let qy = Quaternion::from_angle_y(Rad(self.yaw));
    let qx = Quaternion::from_angle_x(Rad(self.pitch));

    self.orient = (qx * qy).normalize();
    self.view = Matrix4::from(self.orient) * Matrix4::from_translation(-self.eye);
  }

  fn update_projection(&mut self) {
    self.projection = perspective(Rad(self.fovy), self.aspect_ratio, self.z_near, self.z_far);
  }
}

// Prevents flipping the projection.
fn clamp_fovy(fovy: f32) -> f32 {
  fovy.min(std::f32::consts::PI - 0.0001).max(0.0001)
}

// Stops the camera at full verticals instead of going upside down.
fn clamp_pitch(theta: f32) -> f32 {
  theta
    .max(-std::f32::consts::FRAC_PI_2)
    .min(std::f32::consts::FRAC_PI_2)
}

#[cfg(test)]
mod tests {
  use super::*;
  use cgmath::{Point3, Transform as _};

  fn camera() -> FlyCamera {
    FlyCamera::new(Vector3::new(0., 0., 0.), 1., 16. / 9., 0.1, 100.)
  }

  fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    (a - b).magnitude() < 1e-4
  }

  #[test]
  fn looks_towards_negative_z_by_default() {
    assert!(close(camera().forward(), Vector3::new(0., 0., -1.)));
  }

  #[test]
  fn forward_moves_along_look_direction() {
    let mut cam = camera().with_speed(2.);
    cam.handle(&InputAction::Forward);

    assert!(close(cam.eye(), Vector3::new(0., 0., -2.)));

    cam.handle(&InputAction::Backward);
    cam.handle(&InputAction::Right);
    cam.handle(&InputAction::Up);

    assert!(close(cam.eye(), Vector3::new(2., 2., 0.)));
  }

  #[test]
  fn look_at_orients_forward() {
    let target = Vector3::new(10., -5., 3.);
    let cam = camera().look_at(target);

    assert!(close(cam.forward(), target.normalize()));

    let mut cam = cam.with_speed(0.5);
    cam.handle(&InputAction::Forward);
    assert!(close(cam.eye(), target.normalize() * 0.5));
  }

  #[test]
  fn view_brings_eye_to_origin() {
    let cam = FlyCamera::new(Vector3::new(3., 4., 5.), 1., 1., 0.1, 100.)
      .look_at(Vector3::new(0., 0., 0.));
    let p = cam.view().transform_point(Point3::new(3., 4., 5.));
    let target = cam.view().transform_point(Point3::new(0., 0., 0.));

    assert!(close(Vector3::new(p.x, p.y, p.z), Vector3::new(0., 0., 0.)));
    // the target is straight ahead
    assert!(target.x.abs() < 1e-4 && target.y.abs() < 1e-4 && target.z < 0.);
  }

  #[test]
  fn rotation_needs_primary_action() {
    let mut cam = camera();
    cam.handle(&InputAction::CursorMoved { x: 0., y: 0. });
    cam.handle(&InputAction::CursorMoved { x: 100., y: 0. });

    assert!(close(cam.forward(), Vector3::new(0., 0., -1.)));

    cam.handle(&InputAction::PrimaryPressed);
    cam.handle(&InputAction::CursorMoved { x: 200., y: 0. });

    assert!(!close(cam.forward(), Vector3::new(0., 0., -1.)));
    // yawing keeps the camera level
    assert!(cam.forward().y.abs() < 1e-4);
  }

  #[test]
  fn pitch_is_clamped() {
    let mut cam = camera();
    cam.handle(&InputAction::PrimaryPressed);
    cam.handle(&InputAction::CursorMoved { x: 0., y: 0. });
    cam.handle(&InputAction::CursorMoved { x: 0., y: 1e6 });

    assert!(close(cam.forward(), Vector3::new(0., -1., 0.)));
  }

  #[test]
  fn fovy_is_clamped() {
    let mut cam = camera();
    cam.handle(&InputAction::VScroll { amount: 1e6 });
    assert!(cam.fovy() > 0.);

    cam.handle(&InputAction::VScroll { amount: -1e6 });
    assert!(cam.fovy() < std::f32::consts::PI);
  }

  #[test]
  fn resize_updates_aspect_ratio() {
    let mut cam = camera();

    assert!(cam.handle(&InputAction::Resized {
      width: 800,
      height: 400
    }));
    assert_eq!(cam.aspect_ratio(), 2.);

    cam.handle(&InputAction::Resized {
      width: 800,
      height: 0,
    });
    assert_eq!(cam.aspect_ratio(), 2.);
  }

  #[test]
  fn unrelated_actions_are_ignored() {
    let mut cam = camera();
    assert!(!cam.handle(&InputAction::MainToggle));
    assert!(!cam.handle(&InputAction::Quit));
  }
}
