mod renderer;

pub use renderer::{FramePainter, Renderer, SpriteBitmap};
