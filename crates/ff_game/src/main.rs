//! Floorfall -- entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. Keys and mouse
//! buttons land in `InputState`; every `RedrawRequested` measures the frame
//! delta and hands it to `Game::frame`, which owns all game state.
//!
//! Usage: `floorfall [config.json] [--replay script.json]`. With `--replay`
//! the scripted frames run headless and no window is opened.
//!
//! The scene is a `RetainedScene`, which records the render tree but has no
//! drawing backend, so the window stays blank. It is an input source and a
//! frame pump.

mod animation;
mod collision;
mod config;
mod direction;
#[cfg(test)]
mod fixtures;
mod game;
mod levels;
mod map;
mod player;
mod replay;
mod signals;
mod tilemap;
mod tileset;
mod title;

use std::path::PathBuf;
use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use config::{GameConfig, DEFAULT_CONFIG_PATH};
use ff_core::input::{InputState, Key};
use ff_core::time::FrameClock;
use ff_platform::{map_key, map_mouse_button, PlatformConfig};
use ff_render::RetainedScene;
use game::{load_game, Game};
use replay::{load_replay_from_path, run_replay};

struct Args {
    config_path: PathBuf,
    replay_path: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut config_path = None;
    let mut replay_path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--replay" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--replay needs a script path".to_string())?;
                replay_path = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown flag '{flag}'")),
            path if config_path.is_none() => config_path = Some(PathBuf::from(path)),
            extra => return Err(format!("Unexpected argument '{extra}'")),
        }
    }
    Ok(Args {
        config_path: config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
        replay_path,
    })
}

struct WindowState {
    window: Arc<Window>,
    game: Game<RetainedScene>,
    input: InputState,
    clock: FrameClock,
}

struct App {
    config: GameConfig,
    platform: PlatformConfig,
    /// Taken when the window opens.
    pending_game: Option<Game<RetainedScene>>,
    state: Option<WindowState>,
}

impl App {
    fn new(game: Game<RetainedScene>, config: GameConfig) -> Self {
        let platform = PlatformConfig::for_viewport(
            "Floorfall",
            (config.viewport.width, config.viewport.height),
        );
        Self {
            config,
            platform,
            pending_game: Some(game),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(game) = self.pending_game.take() else {
            return;
        };
        let window = match ff_platform::create_window(event_loop, &self.platform) {
            Ok(window) => window,
            Err(err) => {
                log::error!("{err}");
                event_loop.exit();
                return;
            }
        };
        log::debug!(
            "levels: {:?}, player clips: {}",
            self.config.levels,
            self.config.player_animations.display()
        );
        self.state = Some(WindowState {
            window,
            game,
            input: InputState::new(),
            clock: FrameClock::new(),
        });
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.game.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                if let Some(btn) = map_mouse_button(button) {
                    match button_state {
                        ElementState::Pressed => state.input.mouse_down(btn),
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.mouse_position = (position.x, position.y);
            }

            WindowEvent::RedrawRequested => {
                if state.input.is_just_pressed(Key::Escape) {
                    event_loop.exit();
                    return;
                }

                let delta = state.clock.begin_frame();
                state.game.frame(delta, &state.input);
                state.input.end_frame();

                if state.clock.frame_count % 600 == 0 {
                    let stats = state.game.stats();
                    log::debug!(
                        "fps {:.1}, deaths {}, wins {}",
                        state.clock.smoothed_fps,
                        stats.deaths,
                        stats.wins
                    );
                }

                state.window.request_redraw();
            }

            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Floorfall starting...");

    let args = parse_args(std::env::args().skip(1)).unwrap_or_else(|e| panic!("{e}"));
    let (mut game, config) = load_game(RetainedScene::new(), &args.config_path)
        .unwrap_or_else(|e| panic!("Failed to start: {e}"));

    if let Some(replay_path) = args.replay_path {
        let replay = load_replay_from_path(&replay_path).unwrap_or_else(|e| panic!("{e}"));
        let summary = run_replay(&mut game, &replay);
        log::info!(
            "replay '{}': level {:?}, deaths {}, wins {}",
            replay_path.display(),
            summary.level,
            summary.stats.deaths,
            summary.stats.wins
        );
        return;
    }

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(game, config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
