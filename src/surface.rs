use crate::color::Color;
use crate::model::{FontSpec, TextAlign};
use font8x8::legacy::BASIC_LEGACY;

/// A point in the drawing frame: origin at the surface center, y up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A captured rectangle of surface pixels, in device coordinates.
///
/// Restoring writes the bytes back verbatim at the rectangle they were taken
/// from. At most one overlay snapshot is alive at a time; the engine also
/// keeps one base snapshot of the pristine surface for `reset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelRegion {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelRegion {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// RGBA raster surface with a Cartesian drawing frame.
///
/// Public drawing coordinates are center-origin with y increasing upward;
/// internally every input goes through `(x, y) -> (cx + x, cy - y)` before
/// rasterising. All draws mutate the single pixel buffer in place; there is
/// no double buffering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read one pixel, device coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let idx = ((y * self.width + x) * 4) as usize;
        Color::rgba(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    /// Map a drawing-frame point to device coordinates.
    pub fn to_device(&self, p: Point) -> (f64, f64) {
        (
            f64::from(self.width) / 2.0 + p.x,
            f64::from(self.height) / 2.0 - p.y,
        )
    }

    fn device_rounded(&self, p: Point) -> (i32, i32) {
        let (x, y) = self.to_device(p);
        (x.round() as i32, y.round() as i32)
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        self.pixels[idx] = color.r;
        self.pixels[idx + 1] = color.g;
        self.pixels[idx + 2] = color.b;
        self.pixels[idx + 3] = color.a;
    }

    /// Stamp a disc of the given stroke diameter centered on a device pixel.
    fn stamp_brush(&mut self, center: (i32, i32), color: Color, stroke_width: u32) {
        let radius = (stroke_width.saturating_sub(1) / 2) as i32;
        for y in (center.1 - radius)..=(center.1 + radius) {
            for x in (center.0 - radius)..=(center.0 + radius) {
                let dx = x - center.0;
                let dy = y - center.1;
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Bresenham walk between two device pixels, stamping the brush at every
    /// visited cell.
    fn stamp_segment(&mut self, start: (i32, i32), end: (i32, i32), color: Color, width: u32) {
        let (mut x0, mut y0) = start;
        let (x1, y1) = end;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp_brush((x0, y0), color, width);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Stroke a segment. A zero-length segment paints nothing, as an empty
    /// canvas subpath would.
    pub fn draw_line(&mut self, from: Point, to: Point, color: Color, width: f64) {
        if from == to {
            return;
        }
        let brush = brush_width(width);
        let start = self.device_rounded(from);
        let end = self.device_rounded(to);
        self.stamp_segment(start, end, color, brush);
    }

    /// Stroke a circular arc from `start_deg` to `end_deg`; the sign of the
    /// degree interval carries the sweep direction. Sampled at roughly one
    /// pixel of arc length, consecutive samples joined by segments.
    pub fn draw_arc(
        &mut self,
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        color: Color,
        width: f64,
    ) {
        let sweep = end_deg - start_deg;
        if sweep == 0.0 || radius <= 0.0 {
            return;
        }
        let brush = brush_width(width);
        let arc_len = radians(sweep.abs()) * radius;
        let steps = (arc_len.ceil() as u32).max(1);
        let mut prev = self.device_rounded(point_on_circle(center, radius, start_deg));
        for step in 1..=steps {
            let angle = start_deg + sweep * f64::from(step) / f64::from(steps);
            let next = self.device_rounded(point_on_circle(center, radius, angle));
            if next != prev {
                self.stamp_segment(prev, next, color, brush);
            }
            prev = next;
        }
        if steps == 1 {
            // Sub-pixel arc: at least leave the starting sample.
            self.stamp_brush(prev, color, brush);
        }
    }

    /// Fill a closed polygon under the non-zero winding rule. The outline is
    /// closed implicitly from the last point back to the first.
    pub fn fill_polygon(&mut self, outline: &[Point], color: Color) {
        if outline.len() < 3 {
            return;
        }
        let device: Vec<(f64, f64)> = outline.iter().map(|p| self.to_device(*p)).collect();

        let mut crossings: Vec<(f64, i32)> = Vec::new();
        for y in 0..self.height {
            let yc = f64::from(y) + 0.5;
            crossings.clear();
            for i in 0..device.len() {
                let (ax, ay) = device[i];
                let (bx, by) = device[(i + 1) % device.len()];
                let (x, dir) = if ay <= yc && by > yc {
                    (ax + (yc - ay) / (by - ay) * (bx - ax), 1)
                } else if by <= yc && ay > yc {
                    (ax + (yc - ay) / (by - ay) * (bx - ax), -1)
                } else {
                    continue;
                };
                crossings.push((x, dir));
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                let x_min = (pair[0].0 - 0.5).ceil().max(0.0) as i32;
                let x_max = ((pair[1].0 - 0.5).ceil() as i32).min(self.width as i32) - 1;
                for x in x_min..=x_max {
                    self.set_pixel(x, y as i32, color);
                }
            }
        }
    }

    /// Filled disc of the given radius.
    pub fn draw_dot(&mut self, at: Point, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let (cx, cy) = self.to_device(at);
        let reach = radius.ceil() as i32 + 1;
        let (px, py) = (cx.round() as i32, cy.round() as i32);
        for y in (py - reach)..=(py + reach) {
            for x in (px - reach)..=(px + reach) {
                let dx = f64::from(x) + 0.5 - cx;
                let dy = f64::from(y) + 0.5 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Render text from the embedded 8x8 raster font, scaled by an integer
    /// factor approximating the requested point size. `pos` is the baseline
    /// anchor; alignment shifts by the rendered width. Non-ASCII characters
    /// fall back to `?`.
    pub fn draw_text(
        &mut self,
        text: &str,
        pos: Point,
        font: &FontSpec,
        align: TextAlign,
        color: Color,
    ) {
        if text.is_empty() {
            return;
        }
        let scale = (font.size() / 8.0).round().max(1.0) as i32;
        let advance = 8 * scale;
        let rendered_width = advance * text.chars().count() as i32;
        let (dx, dy) = self.to_device(pos);
        let mut pen_x = dx.round() as i32
            - match align {
                TextAlign::Left => 0,
                TextAlign::Center => rendered_width / 2,
                TextAlign::Right => rendered_width,
            };
        let top = dy.round() as i32 - 8 * scale;
        let bold = font.weight().eq_ignore_ascii_case("bold");

        for ch in text.chars() {
            let glyph = glyph_for(ch);
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..8 {
                    if bits >> col & 1 == 0 {
                        continue;
                    }
                    let block_x = pen_x + col * scale;
                    let block_y = top + row as i32 * scale;
                    for yy in 0..scale {
                        for xx in 0..scale {
                            self.set_pixel(block_x + xx, block_y + yy, color);
                            if bold {
                                self.set_pixel(block_x + xx + 1, block_y + yy, color);
                            }
                        }
                    }
                }
            }
            pen_x += advance;
        }
    }

    /// Capture a device-space rectangle, clamped to the surface.
    pub fn snapshot(&self, x: u32, y: u32, width: u32, height: u32) -> PixelRegion {
        let x = x.min(self.width);
        let y = y.min(self.height);
        let width = width.min(self.width - x);
        let height = height.min(self.height - y);
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for row in y..y + height {
            let start = ((row * self.width + x) * 4) as usize;
            let end = start + (width as usize) * 4;
            pixels.extend_from_slice(&self.pixels[start..end]);
        }
        PixelRegion {
            x,
            y,
            width,
            height,
            pixels,
        }
    }

    pub fn snapshot_full(&self) -> PixelRegion {
        self.snapshot(0, 0, self.width, self.height)
    }

    /// Write a captured region back at its origin.
    pub fn restore(&mut self, region: &PixelRegion) {
        for row in 0..region.height {
            let src_start = (row * region.width * 4) as usize;
            let src_end = src_start + (region.width as usize) * 4;
            let dst_start = (((region.y + row) * self.width + region.x) * 4) as usize;
            let dst_end = dst_start + (region.width as usize) * 4;
            self.pixels[dst_start..dst_end].copy_from_slice(&region.pixels[src_start..src_end]);
        }
    }
}

pub(crate) fn radians(degrees: f64) -> f64 {
    degrees * 2.0 * std::f64::consts::PI / 360.0
}

pub(crate) fn point_on_circle(center: Point, radius: f64, angle_deg: f64) -> Point {
    Point::new(
        center.x + radius * radians(angle_deg).cos(),
        center.y + radius * radians(angle_deg).sin(),
    )
}

fn brush_width(width: f64) -> u32 {
    width.round().max(1.0) as u32
}

fn glyph_for(ch: char) -> [u8; 8] {
    let index = if ch.is_ascii() { ch as usize } else { b'?' as usize };
    BASIC_LEGACY[index]
}
