use crate::color::Color;
use crate::model::{FontSpec, Pose, TextAlign};
use crate::surface::{point_on_circle, radians, PixelRegion, Point, Surface};
use tracing::debug;

/// One recorded path operation of a fill session.
///
/// `Line` and `Arc` contribute geometry to the reconstructed polygon and are
/// re-stroked afterwards; `Dot` and `Text` carry no fill geometry and are
/// only re-rendered. `Begin` anchors the polygon and records the pen color
/// at session start (the polygon itself is filled with the fill color
/// current when the session ends).
#[derive(Debug, Clone, PartialEq)]
pub enum FillOp {
    Begin {
        at: Point,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        color: Color,
    },
    Arc {
        center: Point,
        radius: f64,
        start_deg: f64,
        end_deg: f64,
        anticlockwise: bool,
        from: Point,
        to: Point,
        color: Color,
    },
    Dot {
        at: Point,
        size: f64,
        color: Color,
    },
    Text {
        at: Point,
        text: String,
        align: TextAlign,
        font: FontSpec,
        color: Color,
    },
}

/// Buffers the path operations recorded between fill-begin and fill-end and
/// owns the surface capture taken when the session started.
#[derive(Debug, Default)]
pub struct FillRecorder {
    ops: Vec<FillOp>,
    saved: Option<PixelRegion>,
}

impl FillRecorder {
    /// Start a fresh session: capture the surface as it is now and seed the
    /// buffer with the anchor.
    pub fn begin(&mut self, snapshot: PixelRegion, at: Point, pen_color: Color) {
        self.saved = Some(snapshot);
        self.ops = vec![FillOp::Begin {
            at,
            color: pen_color,
        }];
    }

    /// Append one operation. Callers gate on the pose's filling flag.
    pub fn record(&mut self, op: FillOp) {
        self.ops.push(op);
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.saved = None;
    }

    pub fn op_count(&self) -> usize {
        self.ops.len()
    }

    /// Close the session. With no geometry recorded this is a no-op.
    ///
    /// Otherwise the strokes drawn during the session are undone by
    /// restoring the session capture, the recorded path is filled as one
    /// closed polygon, and every recorded operation is then re-rendered
    /// independently in its original order so strokes sit on top of the
    /// fill.
    pub fn finish(&mut self, surface: &mut Surface, pose: &Pose) {
        if self.ops.len() <= 1 {
            self.ops.clear();
            self.saved = None;
            return;
        }
        debug!(ops = self.ops.len(), "reconstructing fill");

        if let Some(saved) = self.saved.take() {
            surface.restore(&saved);
        }
        let outline = self.outline();
        surface.fill_polygon(&outline, pose.fill_color);

        for op in &self.ops {
            match op {
                FillOp::Begin { .. } => {}
                FillOp::Line { from, to, color } => {
                    surface.draw_line(*from, *to, *color, pose.line_width);
                }
                FillOp::Arc {
                    center,
                    radius,
                    start_deg,
                    end_deg,
                    color,
                    ..
                } => {
                    surface.draw_arc(
                        *center,
                        *radius,
                        *start_deg,
                        *end_deg,
                        *color,
                        pose.line_width,
                    );
                }
                FillOp::Dot { at, size, color } => {
                    surface.draw_dot(*at, *size, *color);
                }
                FillOp::Text {
                    at,
                    text,
                    align,
                    font,
                    color,
                } => {
                    surface.draw_text(text, *at, font, *align, *color);
                }
            }
        }
        self.ops.clear();
    }

    /// Flatten the recorded path into one closed outline: the anchor, then
    /// every line endpoint, then every arc sampled at roughly one pixel of
    /// arc length.
    fn outline(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for op in &self.ops {
            match op {
                FillOp::Begin { at, .. } => points.push(*at),
                FillOp::Line { to, .. } => points.push(*to),
                FillOp::Arc {
                    center,
                    radius,
                    start_deg,
                    end_deg,
                    ..
                } => {
                    let sweep = end_deg - start_deg;
                    let steps = ((radians(sweep.abs()) * radius).ceil() as u32).max(2);
                    for step in 0..=steps {
                        let angle = start_deg + sweep * f64::from(step) / f64::from(steps);
                        points.push(point_on_circle(*center, *radius, angle));
                    }
                }
                FillOp::Dot { .. } | FillOp::Text { .. } => {}
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    const BLUE: Color = Color::rgb(0, 0, 255);

    #[test]
    fn finish_without_geometry_is_a_no_op() {
        let mut surface = Surface::new(40, 40);
        let mut recorder = FillRecorder::default();
        recorder.begin(surface.snapshot_full(), Point::new(0.0, 0.0), Color::BLACK);
        recorder.finish(&mut surface, &Pose::default());
        assert_eq!(recorder.op_count(), 0);
        assert!(surface.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn finish_restores_session_capture_before_filling() {
        let mut surface = Surface::new(60, 60);
        let mut recorder = FillRecorder::default();
        recorder.begin(surface.snapshot_full(), Point::new(0.0, 0.0), Color::BLACK);

        // A stroke drawn mid-session, outside the polygon, must vanish: the
        // reconstruction restores the capture and only re-renders recorded
        // operations.
        surface.draw_line(Point::new(-25.0, -25.0), Point::new(-15.0, -25.0), BLUE, 1.0);
        recorder.record(FillOp::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(20.0, 0.0),
            color: BLUE,
        });
        recorder.record(FillOp::Line {
            from: Point::new(20.0, 0.0),
            to: Point::new(20.0, 20.0),
            color: BLUE,
        });

        let pose = Pose {
            fill_color: Color::rgb(255, 0, 0),
            ..Pose::default()
        };
        recorder.finish(&mut surface, &pose);

        // The stray stroke was not recorded, so it is gone.
        assert_eq!(surface.pixel(10, 55).a, 0);
        // Interior of the triangle (0,0) -> (20,0) -> (20,20).
        assert_eq!(surface.pixel(45, 25), Color::rgb(255, 0, 0));
        // Recorded strokes are re-rendered on top.
        assert_eq!(surface.pixel(40, 30), BLUE);
        assert_eq!(recorder.op_count(), 0);
    }

    #[test]
    fn dot_and_text_reappear_after_finish() {
        let mut surface = Surface::new(80, 80);
        let mut recorder = FillRecorder::default();
        recorder.begin(surface.snapshot_full(), Point::new(0.0, 0.0), Color::BLACK);
        recorder.record(FillOp::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(10.0, 0.0),
            color: Color::BLACK,
        });
        recorder.record(FillOp::Dot {
            at: Point::new(-20.0, -20.0),
            size: 4.0,
            color: BLUE,
        });

        recorder.finish(&mut surface, &Pose::default());
        // Dot at device (20, 60).
        assert_eq!(surface.pixel(20, 60), BLUE);
    }
}
