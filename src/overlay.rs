use crate::model::Pose;
use crate::surface::{radians, PixelRegion, Point, Surface};

/// Manages the transient turtle marker drawn over the persistent raster.
///
/// The marker is never part of the durable picture: `draw` first captures
/// the whole surface, then paints the marker; `clear` puts the capture back.
/// The replay loop guarantees the draw/clear pairing, so at most one
/// snapshot is alive at any time.
#[derive(Debug)]
pub struct TurtleOverlay {
    marker_width: f64,
    marker_height: f64,
    snapshot: Option<PixelRegion>,
}

impl TurtleOverlay {
    pub fn new(marker_width: f64, marker_height: f64) -> Self {
        Self {
            marker_width,
            marker_height,
            snapshot: None,
        }
    }

    /// Paint the marker at the given pose. Does nothing while the turtle is
    /// hidden; in that case no snapshot is taken and the matching `clear`
    /// falls through.
    ///
    /// The marker is a four-point dart: tip at the pose position leading the
    /// heading, a notch 0.7 heights behind the tip and the two legs a full
    /// height behind, half a width out to each side.
    pub fn draw(&mut self, surface: &mut Surface, pose: &Pose) {
        if !pose.is_turtle_on {
            return;
        }
        self.snapshot = Some(surface.snapshot_full());

        let (hx, hy) = (radians(pose.heading).cos(), radians(pose.heading).sin());
        let (bx, by) = (self.marker_height * hx, self.marker_height * hy);
        let half_w = 0.5 * self.marker_width;

        let tip = Point::new(pose.x, pose.y);
        let notch = Point::new(pose.x - 0.7 * bx, pose.y - 0.7 * by);
        let left_leg = Point::new(pose.x - half_w * hy - bx, pose.y + half_w * hx - by);
        let right_leg = Point::new(pose.x + half_w * hy - bx, pose.y - half_w * hx - by);

        let outline = [tip, right_leg, notch, left_leg];
        surface.fill_polygon(&outline, pose.fill_color);
        for i in 0..outline.len() {
            surface.draw_line(
                outline[i],
                outline[(i + 1) % outline.len()],
                pose.color,
                pose.line_width,
            );
        }
    }

    /// Remove the marker by restoring the pre-draw capture. Tolerates being
    /// called with nothing pending.
    pub fn clear(&mut self, surface: &mut Surface) {
        if let Some(region) = self.snapshot.take() {
            surface.restore(&region);
        }
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn pose_at(x: f64, y: f64, heading: f64) -> Pose {
        Pose {
            x,
            y,
            heading,
            ..Pose::default()
        }
    }

    #[test]
    fn draw_then_clear_leaves_the_raster_untouched() {
        let mut surface = Surface::new(60, 60);
        surface.draw_dot(Point::new(5.0, 5.0), 3.0, Color::rgb(0, 0, 255));
        let before = surface.pixels().to_vec();

        let mut overlay = TurtleOverlay::new(10.0, 15.0);
        overlay.draw(&mut surface, &pose_at(0.0, 0.0, 90.0));
        assert_ne!(surface.pixels(), before.as_slice());
        assert!(overlay.has_snapshot());

        overlay.clear(&mut surface);
        assert_eq!(surface.pixels(), before.as_slice());
        assert!(!overlay.has_snapshot());
    }

    #[test]
    fn hidden_turtle_draws_nothing_and_takes_no_snapshot() {
        let mut surface = Surface::new(40, 40);
        let mut overlay = TurtleOverlay::new(10.0, 15.0);
        let pose = Pose {
            is_turtle_on: false,
            ..Pose::default()
        };
        overlay.draw(&mut surface, &pose);
        assert!(surface.pixels().iter().all(|&b| b == 0));
        assert!(!overlay.has_snapshot());
    }

    #[test]
    fn clear_without_pending_snapshot_is_a_no_op() {
        let mut surface = Surface::new(10, 10);
        let mut overlay = TurtleOverlay::new(10.0, 15.0);
        overlay.clear(&mut surface);
        assert!(surface.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn marker_tip_sits_at_the_pose_position() {
        let mut surface = Surface::new(60, 60);
        let mut overlay = TurtleOverlay::new(10.0, 15.0);
        // Heading east: the dart extends to the left of the tip.
        overlay.draw(&mut surface, &pose_at(10.0, 0.0, 0.0));
        // Tip pixel at device (40, 30).
        assert!(surface.pixel(40, 30).a > 0);
        // Body behind the tip.
        assert!(surface.pixel(33, 30).a > 0);
        // Nothing ahead of the tip.
        assert_eq!(surface.pixel(45, 30).a, 0);
    }
}
