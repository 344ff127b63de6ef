mod platform;

use glfw::{Action, Context as _, Key, Modifiers, MouseButton, SwapInterval, WindowEvent, WindowMode};
use luminance_glfw::{GlfwSurface, GlfwSurfaceError};
use opengl_demos::{Example, InputAction, LoopFeedback};
use platform::{DesktopPlatformServices, PlatformError};
use std::{iter, path::PathBuf, time::Instant};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(short, long, default_value = "assets")]
  /// Directory where to pick textures from.
  textures: PathBuf,

  #[structopt(short, long)]
  /// List available examples.
  list_examples: bool,

  #[structopt(long, default_value = "1280")]
  /// Width of the window.
  width: u32,

  #[structopt(long, default_value = "720")]
  /// Height of the window.
  height: u32,

  /// Example to run.
  example: Option<String>,
}

/// Macro to declaratively add examples.
macro_rules! examples {
  ($($ex_name:literal, $ex_ident:ident),* $(,)?) => {
    fn show_available_examples() {
      println!("available examples:");
      $( println!("  - {}", $ex_name); )*
    }

    // create a function that will run an example based on its name
    fn pick_and_run_example(cli_opts: CLIOpts) {
      let example_name = cli_opts.example.as_deref();
      match example_name {
        $(
          Some($ex_name) => {
            run_example::<opengl_demos::$ex_ident::LocalExample>(&cli_opts, $ex_name)
          }
        ),*

        _ => {
          log::error!("no example found");
          show_available_examples();
        }
      }
    }
  }
}

// Run an example; errors are logged and stop it.
fn run_example<E>(cli_opts: &CLIOpts, name: &str)
where
  E: Example,
{
  // Check the features so that we know what we need to load.
  let mut services = match DesktopPlatformServices::new(&cli_opts.textures, &E::features()) {
    Ok(services) => services,
    Err(e) => {
      log::error!("{}", e);
      return;
    }
  };

  // First thing first: we create a new surface to render to and get events from.
  let (width, height) = (cli_opts.width, cli_opts.height);
  let surface = GlfwSurface::new(|glfw| {
    let (mut window, events) = glfw
      .create_window(width, height, name, WindowMode::Windowed)
      .ok_or(GlfwSurfaceError::UserError(PlatformError::CannotCreateWindow))?;

    window.make_current();
    window.set_all_polling(true);
    glfw.set_swap_interval(SwapInterval::Sync(1));

    Ok((window, events))
  });

  let surface = match surface {
    Ok(surface) => surface,
    Err(e) => {
      log::error!("cannot create GLFW surface: {}", e);
      return;
    }
  };
  let mut context = surface.context;
  let events = surface.events_rx;

  let example = match E::bootstrap(&mut services, &mut context) {
    Ok(example) => example,
    Err(e) => {
      log::error!("cannot bootstrap {}: {}", name, e);
      return;
    }
  };
  let start_t = Instant::now();

  // render a dummy frame to pass a single action containing the initial framebuffer size; some
  // examples use a default size that is not correct, and this allows them to bootstrap correctly
  let (fb_w, fb_h) = context.window.get_framebuffer_size();
  let back_buffer = match context.back_buffer() {
    Ok(back_buffer) => back_buffer,
    Err(e) => {
      log::error!("cannot get the back buffer: {}", e);
      return;
    }
  };
  let feedback = example.render_frame(
    0.,
    back_buffer,
    iter::once(InputAction::Resized {
      width: fb_w as _,
      height: fb_h as _,
    }),
    &mut context,
  );
  let mut example = match feedback {
    LoopFeedback::Exit => return,
    LoopFeedback::Continue(example) => example,
  };

  'app: loop {
    // handle events
    context.window.glfw.poll_events();
    let actions = glfw::flush_messages(&events).flat_map(|(_, event)| adapt_events(event));

    let back_buffer = match context.back_buffer() {
      Ok(back_buffer) => back_buffer,
      Err(e) => {
        log::error!("cannot get the back buffer: {}", e);
        break 'app;
      }
    };

    let t = start_t.elapsed().as_secs_f32();
    let feedback = example.render_frame(t, back_buffer, actions, &mut context);

    if let LoopFeedback::Continue(stepped) = feedback {
      example = stepped;
      context.window.swap_buffers();
    } else {
      break 'app;
    }
  }
}

fn adapt_events(event: WindowEvent) -> Option<InputAction> {
  match event {
    WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => {
      Some(InputAction::Quit)
    }

    WindowEvent::Key(Key::Space, _, Action::Release, mods) => {
      if mods.is_empty() {
        Some(InputAction::MainToggle)
      } else if mods == Modifiers::Shift {
        Some(InputAction::AuxiliaryToggle)
      } else {
        None
      }
    }

    WindowEvent::Key(key, _, Action::Press, _) | WindowEvent::Key(key, _, Action::Repeat, _) => {
      log::debug!("key press: {:?}", key);
      match key {
        Key::A => Some(InputAction::Left),
        Key::D => Some(InputAction::Right),
        Key::W => Some(InputAction::Forward),
        Key::S => Some(InputAction::Backward),
        Key::F => Some(InputAction::Up),
        Key::R => Some(InputAction::Down),
        _ => None,
      }
    }

    WindowEvent::MouseButton(MouseButton::Button1, action, _) => match action {
      Action::Press => Some(InputAction::PrimaryPressed),
      Action::Release => Some(InputAction::PrimaryReleased),
      _ => None,
    },

    WindowEvent::CursorPos(x, y) => Some(InputAction::CursorMoved {
      x: x as _,
      y: y as _,
    }),

    WindowEvent::FramebufferSize(width, height) => Some(InputAction::Resized {
      width: width.max(0) as _,
      height: height.max(0) as _,
    }),

    WindowEvent::Scroll(_, amount) => Some(InputAction::VScroll {
      amount: amount as f32,
    }),

    _ => None,
  }
}

examples! {
  "textured-cube", textured_cube,
  "terrain", terrain,
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let cli_opts = CLIOpts::from_args();

  if cli_opts.list_examples {
    show_available_examples();
  } else {
    pick_and_run_example(cli_opts);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_defaults() {
    let opts = CLIOpts::from_iter(["opengl-demos-desktop", "terrain"]);

    assert_eq!(opts.textures, PathBuf::from("assets"));
    assert_eq!((opts.width, opts.height), (1280, 720));
    assert_eq!(opts.example.as_deref(), Some("terrain"));
    assert!(!opts.list_examples);
  }

  #[test]
  fn space_toggles() {
    assert_eq!(
      adapt_events(WindowEvent::Key(
        Key::Space,
        0,
        Action::Release,
        Modifiers::empty()
      )),
      Some(InputAction::MainToggle)
    );
    assert_eq!(
      adapt_events(WindowEvent::Key(
        Key::Space,
        0,
        Action::Release,
        Modifiers::Shift
      )),
      Some(InputAction::AuxiliaryToggle)
    );
  }

  #[test]
  fn escape_and_close_quit() {
    assert_eq!(adapt_events(WindowEvent::Close), Some(InputAction::Quit));
    assert_eq!(
      adapt_events(WindowEvent::Key(
        Key::Escape,
        0,
        Action::Release,
        Modifiers::empty()
      )),
      Some(InputAction::Quit)
    );
  }

  #[test]
  fn movement_keys_repeat() {
    assert_eq!(
      adapt_events(WindowEvent::Key(Key::W, 0, Action::Repeat, Modifiers::empty())),
      Some(InputAction::Forward)
    );
    assert_eq!(
      adapt_events(WindowEvent::Key(Key::W, 0, Action::Release, Modifiers::empty())),
      None
    );
  }
}
