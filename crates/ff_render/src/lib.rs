pub mod camera;
pub mod scene;

pub use camera::{Camera2D, CameraUniform, MAX_ZOOM, MIN_ZOOM};
pub use scene::{Aabb, Drawable, Filter, NodeId, RetainedScene, SceneGraph};
