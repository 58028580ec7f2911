mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod tools;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use rendering::{FramePainter, Renderer, SpriteBitmap};
pub use scene::{InputSnapshot, Scene, SceneCommand, Vec2};
pub use tools::{draw_text, measure_text, GLYPH_HEIGHT_PX, GLYPH_WIDTH_PX};
pub(crate) use tools::OverlayData;
