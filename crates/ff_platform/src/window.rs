//! Game window creation. The window is only a surface and an input source;
//! nothing here knows about levels or the player.

use std::sync::Arc;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Smallest size the window may be dragged to.
    pub min_width: u32,
    pub min_height: u32,
}

impl PlatformConfig {
    /// Window sized to the game viewport.
    pub fn for_viewport(title: &str, viewport: (u32, u32)) -> Self {
        Self {
            title: title.to_string(),
            width: viewport.0.max(1),
            height: viewport.1.max(1),
            ..Self::default()
        }
    }

    pub fn attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.width, self.height))
            .with_min_inner_size(LogicalSize::new(
                self.min_width.min(self.width),
                self.min_height.min(self.height),
            ))
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Floorfall".to_string(),
            width: 1280,
            height: 720,
            min_width: 320,
            min_height: 180,
        }
    }
}

pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, String> {
    let window = event_loop
        .create_window(config.attributes())
        .map_err(|e| format!("Failed to create window '{}': {e}", config.title))?;
    log::info!(
        "Window created: {}x{} '{}'",
        config.width,
        config.height,
        config.title
    );
    Ok(Arc::new(window))
}
