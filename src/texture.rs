use image::{Rgba, RgbaImage};

use crate::layout::{PanelLayout, TextRun, CANVAS_HEIGHT, CANVAS_WIDTH};

/// One uploaded revision of the panel texture: the rasterized background plus
/// the text runs for the host's glyph renderer. `generation` increments on
/// every repaint and serves as the dirty mark.
#[derive(Debug, Clone)]
pub struct PanelFrame {
    pub pixels: RgbaImage,
    pub runs: Vec<TextRun>,
    pub generation: u64,
}

/// CPU-side panel texture. Repainting rasterizes the layout's rectangles into
/// an RGBA bitmap and bumps the generation counter.
#[derive(Debug)]
pub struct PanelTexture {
    frame: PanelFrame,
}

impl PanelTexture {
    pub fn new() -> Self {
        Self {
            frame: PanelFrame {
                pixels: RgbaImage::new(CANVAS_WIDTH, CANVAS_HEIGHT),
                runs: Vec::new(),
                generation: 0,
            },
        }
    }

    /// Clears and redraws the bitmap from `layout`, marking the frame dirty.
    pub fn repaint(&mut self, layout: &PanelLayout) {
        let pixels = &mut self.frame.pixels;
        for p in pixels.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
        for rect in &layout.rects {
            fill_rect(
                pixels,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                rgba(rect.color),
            );
        }
        self.frame.runs = layout.runs.clone();
        self.frame.generation += 1;
    }

    pub fn frame(&self) -> &PanelFrame {
        &self.frame
    }

    pub fn generation(&self) -> u64 {
        self.frame.generation
    }
}

impl Default for PanelTexture {
    fn default() -> Self {
        Self::new()
    }
}

fn rgba(color: u32) -> Rgba<u8> {
    Rgba([
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
        0xFF,
    ])
}

fn fill_rect(img: &mut RgbaImage, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
    let x0 = x.max(0.0) as u32;
    let y0 = y.max(0.0) as u32;
    let x1 = ((x + width).max(0.0) as u32).min(img.width());
    let y1 = ((y + height).max(0.0) as u32).min(img.height());
    for py in y0..y1 {
        for px in x0..x1 {
            img.put_pixel(px, py, color);
        }
    }
}
