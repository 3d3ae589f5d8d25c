//! Scene simulation module
//!
//! All demo logic lives here and stays free of rendering and platform code:
//! - Scene state is owned explicitly and passed by reference
//! - Seeded RNG only (same seed, same enemy layout)
//! - Stable iteration order (enemies by creation id)

pub mod input;
pub mod scene;
pub mod state;
pub mod tick;

pub use input::{InputState, MotionTelemetry, MoveKey, OrientationSample, PointerDrag, drag_look};
pub use scene::{build_scene, place_enemies};
pub use state::{CameraEuler, CameraPhase, CameraState, DirectionArrow, Enemy, Scene, Slab};
pub use tick::{FrameEvent, frame_update};
