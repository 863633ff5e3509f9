use glam::{Mat4, Vec2};

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 6.0;
pub const ZOOM_STEP: f32 = 0.01;
pub const DEFAULT_SPEED: f32 = 10.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Viewport over the level, in map pixels.
///
/// `position` is the world point under the screen centre, which is also where
/// the screen-fixed player stands. Moving the camera moves the world.
#[derive(Debug, Clone)]
pub struct Camera2D {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    pub zoom_step: f32,
    pub viewport: (u32, u32),
    zoom: f32,
}

impl Camera2D {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            speed: DEFAULT_SPEED,
            zoom_step: ZOOM_STEP,
            viewport: (viewport_width, viewport_height),
            zoom: 1.0,
        }
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
        self
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Step the zoom by `steps * zoom_step` (negative zooms out), clamped to
    /// `[MIN_ZOOM, MAX_ZOOM]`. Non-finite input is ignored.
    pub fn set_zoom(&mut self, steps: f32) {
        let next = self.zoom + steps * self.zoom_step;
        if next.is_finite() {
            self.zoom = next.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Velocity follows the player's locomotion intent (each axis in -1..=1).
    pub fn set_velocity_from_intent(&mut self, intent: Vec2) {
        self.velocity = intent * self.speed;
    }

    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != Vec2::ZERO
    }

    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
    }

    /// Integrate position. Velocity is divided by zoom so apparent on-screen
    /// speed does not change as the view zooms.
    pub fn update(&mut self, delta: f32) {
        if !delta.is_finite() || delta <= 0.0 {
            return;
        }
        self.position += self.velocity / self.zoom * delta;
    }

    pub fn screen_center(&self) -> Vec2 {
        Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32) * 0.5
    }

    /// Screen-space translation for a container holding world content.
    pub fn world_origin_on_screen(&self) -> Vec2 {
        self.screen_center() - self.position * self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.world_origin_on_screen() + world * self.zoom
    }

    pub fn view_proj(&self) -> Mat4 {
        let half_w = (self.viewport.0 as f32) / (2.0 * self.zoom);
        let half_h = (self.viewport.1 as f32) / (2.0 * self.zoom);

        // Screen y grows downward, like the map rows.
        Mat4::orthographic_rh(
            self.position.x - half_w,
            self.position.x + half_w,
            self.position.y + half_h,
            self.position.y - half_h,
            -1.0,
            1.0,
        )
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }
}
