mod overlay;
mod perf_stats;
mod screenshot;
mod text;

pub use text::{draw_text, measure_text, GLYPH_HEIGHT_PX, GLYPH_WIDTH_PX};

pub(crate) use overlay::{draw_overlay, OverlayData};
pub(crate) use perf_stats::PerfStats;
pub(crate) use screenshot::save_screenshot;
