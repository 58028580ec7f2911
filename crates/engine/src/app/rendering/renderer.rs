use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture};
use winit::window::Window;

/// Owns the GPU surface and the fixed-size RGBA frame the scene draws into.
/// The frame keeps its virtual resolution regardless of window size; the
/// surface scales it to the window on present.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    surface_width: u32,
    surface_height: u32,
}

impl Renderer {
    pub fn new(
        window: Arc<Window>,
        surface_width: u32,
        surface_height: u32,
    ) -> Result<Self, pixels::Error> {
        let pixels = build_pixels(Arc::clone(&window), surface_width, surface_height)?;
        Ok(Self {
            window,
            pixels,
            surface_width,
            surface_height,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Tracks window resizes. The frame itself never changes size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), pixels::TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels.resize_surface(width, height)
    }

    pub fn draw_frame<F>(&mut self, draw: F) -> Result<(), pixels::Error>
    where
        F: FnOnce(&mut FramePainter<'_>),
    {
        let mut painter =
            FramePainter::new(self.pixels.frame_mut(), self.surface_width, self.surface_height);
        draw(&mut painter);
        self.pixels.render()
    }

    /// Read-only view of the most recently drawn frame, RGBA row-major.
    pub fn frame(&self) -> &[u8] {
        self.pixels.frame()
    }

    pub fn frame_size(&self) -> (u32, u32) {
        (self.surface_width, self.surface_height)
    }
}

fn build_pixels(
    window: Arc<Window>,
    surface_width: u32,
    surface_height: u32,
) -> Result<Pixels<'static>, pixels::Error> {
    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(
        window_size.width.max(1),
        window_size.height.max(1),
        window,
    );
    Pixels::new(surface_width, surface_height, surface_texture)
}

/// Mutable view over one frame. All draw calls clip to the frame bounds, so
/// callers may pass partially or fully offscreen coordinates.
pub struct FramePainter<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> FramePainter<'a> {
    pub(crate) fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]) {
        if color[3] == 0 {
            return;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width as i32).min(self.width as i32);
        let y1 = y.saturating_add(height as i32).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                let index = self.pixel_index(px, py);
                let dst = &mut self.frame[index..index + 4];
                if color[3] == 255 {
                    dst.copy_from_slice(&color);
                } else {
                    blend_rgba(dst, color);
                }
            }
        }
    }

    pub fn blit(&mut self, sprite: &SpriteBitmap, x: i32, y: i32, flip_x: bool) {
        for sy in 0..sprite.height {
            let dy = y + sy as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            for sx in 0..sprite.width {
                let dx = x + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let src_x = if flip_x { sprite.width - 1 - sx } else { sx };
                let color = sprite.pixel(src_x, sy);
                if color[3] == 0 {
                    continue;
                }
                let index = self.pixel_index(dx, dy);
                let dst = &mut self.frame[index..index + 4];
                if color[3] == 255 {
                    dst.copy_from_slice(&color);
                } else {
                    blend_rgba(dst, color);
                }
            }
        }
    }

    /// Draws the sprite resampled to `dst_height` rows, nearest-neighbor.
    pub fn blit_squashed(&mut self, sprite: &SpriteBitmap, x: i32, y: i32, dst_height: u32) {
        if dst_height == 0 {
            return;
        }
        for row in 0..dst_height {
            let dy = y + row as i32;
            if dy < 0 || dy >= self.height as i32 {
                continue;
            }
            let src_y = row * sprite.height / dst_height;
            for sx in 0..sprite.width {
                let dx = x + sx as i32;
                if dx < 0 || dx >= self.width as i32 {
                    continue;
                }
                let color = sprite.pixel(sx, src_y);
                if color[3] == 0 {
                    continue;
                }
                let index = self.pixel_index(dx, dy);
                let dst = &mut self.frame[index..index + 4];
                if color[3] == 255 {
                    dst.copy_from_slice(&color);
                } else {
                    blend_rgba(dst, color);
                }
            }
        }
    }

    fn pixel_index(&self, x: i32, y: i32) -> usize {
        (y as u32 * self.width + x as u32) as usize * 4
    }
}

/// Small RGBA image built at startup by stacking filled rectangles, the way
/// the tile and entity art is authored.
#[derive(Debug, Clone)]
pub struct SpriteBitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl SpriteBitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; (width * height * 4) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opaque colors overwrite, translucent colors blend onto what is
    /// already there. Clips to the bitmap bounds.
    pub fn fill(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]) {
        if color[3] == 0 {
            return;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width as i32).min(self.width as i32);
        let y1 = y.saturating_add(height as i32).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                let index = (py as u32 * self.width + px as u32) as usize * 4;
                let dst = &mut self.rgba[index..index + 4];
                if color[3] == 255 {
                    dst.copy_from_slice(&color);
                } else {
                    blend_rgba(dst, color);
                }
            }
        }
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let index = (y * self.width + x) as usize * 4;
        [
            self.rgba[index],
            self.rgba[index + 1],
            self.rgba[index + 2],
            self.rgba[index + 3],
        ]
    }
}

fn blend_rgba(dst: &mut [u8], color: [u8; 4]) {
    let alpha = color[3] as u32;
    let inverse = 255 - alpha;
    for channel in 0..3 {
        let src = color[channel] as u32;
        let base = dst[channel] as u32;
        dst[channel] = ((src * alpha + base * inverse) / 255) as u8;
    }
    dst[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painter_over(frame: &mut Vec<u8>, width: u32, height: u32) -> FramePainter<'_> {
        frame.resize((width * height * 4) as usize, 0);
        FramePainter::new(frame, width, height)
    }

    fn pixel_at(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let index = (y * width + x) as usize * 4;
        [
            frame[index],
            frame[index + 1],
            frame[index + 2],
            frame[index + 3],
        ]
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut frame = Vec::new();
        let mut painter = painter_over(&mut frame, 4, 3);
        painter.clear([10, 20, 30, 255]);

        for x in 0..4 {
            for y in 0..3 {
                assert_eq!(pixel_at(&frame, 4, x, y), [10, 20, 30, 255]);
            }
        }
    }

    #[test]
    fn fill_rect_clips_to_frame_bounds() {
        let mut frame = Vec::new();
        let mut painter = painter_over(&mut frame, 4, 4);
        painter.fill_rect(-2, -2, 4, 4, [255, 0, 0, 255]);
        painter.fill_rect(3, 3, 10, 10, [0, 255, 0, 255]);

        assert_eq!(pixel_at(&frame, 4, 0, 0), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 4, 1, 1), [255, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 4, 2, 2), [0, 0, 0, 0]);
        assert_eq!(pixel_at(&frame, 4, 3, 3), [0, 255, 0, 255]);
    }

    #[test]
    fn fill_rect_fully_offscreen_is_a_no_op() {
        let mut frame = Vec::new();
        let mut painter = painter_over(&mut frame, 4, 4);
        painter.fill_rect(100, 100, 8, 8, [255, 255, 255, 255]);
        painter.fill_rect(-100, -100, 8, 8, [255, 255, 255, 255]);

        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn translucent_fill_blends_with_existing_pixels() {
        let mut frame = Vec::new();
        let mut painter = painter_over(&mut frame, 2, 2);
        painter.clear([200, 100, 0, 255]);
        painter.fill_rect(0, 0, 1, 1, [0, 0, 0, 51]);

        let blended = pixel_at(&frame, 2, 0, 0);
        assert_eq!(blended, [160, 80, 0, 255]);
        assert_eq!(pixel_at(&frame, 2, 1, 0), [200, 100, 0, 255]);
    }

    #[test]
    fn blit_skips_transparent_sprite_pixels() {
        let mut sprite = SpriteBitmap::new(2, 1);
        sprite.fill(0, 0, 1, 1, [9, 9, 9, 255]);

        let mut frame = Vec::new();
        let mut painter = painter_over(&mut frame, 2, 1);
        painter.clear([1, 2, 3, 255]);
        painter.blit(&sprite, 0, 0, false);

        assert_eq!(pixel_at(&frame, 2, 0, 0), [9, 9, 9, 255]);
        assert_eq!(pixel_at(&frame, 2, 1, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn blit_flip_mirrors_horizontally() {
        let mut sprite = SpriteBitmap::new(3, 1);
        sprite.fill(0, 0, 1, 1, [255, 0, 0, 255]);
        sprite.fill(2, 0, 1, 1, [0, 0, 255, 255]);

        let mut frame = Vec::new();
        let mut painter = painter_over(&mut frame, 3, 1);
        painter.blit(&sprite, 0, 0, true);

        assert_eq!(pixel_at(&frame, 3, 0, 0), [0, 0, 255, 255]);
        assert_eq!(pixel_at(&frame, 3, 2, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn blit_clips_offscreen_without_panicking() {
        let mut sprite = SpriteBitmap::new(4, 4);
        sprite.fill(0, 0, 4, 4, [255, 255, 255, 255]);

        let mut frame = Vec::new();
        let mut painter = painter_over(&mut frame, 4, 4);
        painter.blit(&sprite, -2, -2, false);
        painter.blit(&sprite, 3, 3, false);

        assert_eq!(pixel_at(&frame, 4, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel_at(&frame, 4, 3, 3), [255, 255, 255, 255]);
        assert_eq!(pixel_at(&frame, 4, 2, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn blit_squashed_halves_rows() {
        let mut sprite = SpriteBitmap::new(1, 4);
        sprite.fill(0, 0, 1, 1, [10, 0, 0, 255]);
        sprite.fill(0, 1, 1, 1, [20, 0, 0, 255]);
        sprite.fill(0, 2, 1, 1, [30, 0, 0, 255]);
        sprite.fill(0, 3, 1, 1, [40, 0, 0, 255]);

        let mut frame = Vec::new();
        let mut painter = painter_over(&mut frame, 1, 4);
        painter.blit_squashed(&sprite, 0, 0, 2);

        assert_eq!(pixel_at(&frame, 1, 0, 0), [10, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 1, 0, 1), [30, 0, 0, 255]);
        assert_eq!(pixel_at(&frame, 1, 0, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn sprite_fill_layers_translucent_over_opaque() {
        let mut sprite = SpriteBitmap::new(1, 1);
        sprite.fill(0, 0, 1, 1, [200, 76, 12, 255]);
        sprite.fill(0, 0, 1, 1, [0, 0, 0, 51]);

        assert_eq!(sprite.pixel(0, 0), [160, 60, 9, 255]);
    }

    #[test]
    fn sprite_fill_clips_to_bitmap() {
        let mut sprite = SpriteBitmap::new(2, 2);
        sprite.fill(1, 1, 10, 10, [5, 5, 5, 255]);

        assert_eq!(sprite.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(sprite.pixel(1, 1), [5, 5, 5, 255]);
    }
}
