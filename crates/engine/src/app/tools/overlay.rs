use super::perf_stats::RollingMsStats;
use super::text::{draw_text, measure_text, GLYPH_HEIGHT_PX};
use crate::app::rendering::FramePainter;

const OVERLAY_MARGIN_PX: i32 = 4;
const OVERLAY_PADDING_PX: i32 = 3;
const OVERLAY_LINE_GAP_PX: i32 = 2;
const OVERLAY_TEXT_SCALE: i32 = 1;
const OVERLAY_PANEL_COLOR: [u8; 4] = [0, 0, 0, 160];
const OVERLAY_TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];

/// Everything the debug overlay shows for the current frame.
#[derive(Debug, Clone)]
pub(crate) struct OverlayData {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
    pub slowest_frame_ms: f32,
    pub sim: RollingMsStats,
    pub render: RollingMsStats,
    pub step_scale: f32,
    pub scene_title: Option<String>,
}

pub(crate) fn draw_overlay(painter: &mut FramePainter<'_>, data: &OverlayData) {
    let lines = build_overlay_lines(data);
    let mut panel_width = 0;
    for line in &lines {
        let (line_width, _) = measure_text(line, OVERLAY_TEXT_SCALE);
        panel_width = panel_width.max(line_width);
    }
    let line_height = GLYPH_HEIGHT_PX * OVERLAY_TEXT_SCALE + OVERLAY_LINE_GAP_PX;
    let panel_height = lines.len() as i32 * line_height - OVERLAY_LINE_GAP_PX;

    painter.fill_rect(
        OVERLAY_MARGIN_PX,
        OVERLAY_MARGIN_PX,
        (panel_width + OVERLAY_PADDING_PX * 2).max(0) as u32,
        (panel_height + OVERLAY_PADDING_PX * 2).max(0) as u32,
        OVERLAY_PANEL_COLOR,
    );
    for (index, line) in lines.iter().enumerate() {
        draw_text(
            painter,
            OVERLAY_MARGIN_PX + OVERLAY_PADDING_PX,
            OVERLAY_MARGIN_PX + OVERLAY_PADDING_PX + index as i32 * line_height,
            OVERLAY_TEXT_SCALE,
            OVERLAY_TEXT_COLOR,
            line,
        );
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        format!("FPS {:.0} TPS {:.0}", data.fps, data.tps),
        format!(
            "FRAME {:.2} MS (MAX {:.2})",
            data.frame_time_ms, data.slowest_frame_ms
        ),
        format_window_line("SIM", data.sim),
        format_window_line("RENDER", data.render),
        format!("STEP X{:.2}", data.step_scale),
    ];
    if let Some(title) = &data.scene_title {
        lines.push(title.clone());
    }
    lines
}

fn format_window_line(label: &str, stats: RollingMsStats) -> String {
    format!(
        "{label} {:.2} AVG {:.2} MAX {:.2}",
        stats.last_ms, stats.avg_ms, stats.max_ms
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> OverlayData {
        OverlayData {
            fps: 59.7,
            tps: 60.2,
            frame_time_ms: 16.61,
            slowest_frame_ms: 35.02,
            sim: RollingMsStats {
                last_ms: 0.42,
                avg_ms: 0.4,
                max_ms: 1.25,
            },
            render: RollingMsStats::default(),
            step_scale: 1.0,
            scene_title: None,
        }
    }

    #[test]
    fn lines_cover_rates_timings_and_step_scale() {
        let lines = build_overlay_lines(&sample_data());

        assert_eq!(lines[0], "FPS 60 TPS 60");
        assert_eq!(lines[1], "FRAME 16.61 MS (MAX 35.02)");
        assert_eq!(lines[2], "SIM 0.42 AVG 0.40 MAX 1.25");
        assert_eq!(lines[4], "STEP X1.00");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn scene_title_appends_a_line() {
        let mut data = sample_data();
        data.scene_title = Some("RUN SCORE 000100".to_string());

        let lines = build_overlay_lines(&data);
        assert_eq!(lines.last().map(String::as_str), Some("RUN SCORE 000100"));
    }

    #[test]
    fn draw_clips_on_a_tiny_frame() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        let mut painter = FramePainter::new(&mut frame, 8, 8);
        draw_overlay(&mut painter, &sample_data());
    }
}
