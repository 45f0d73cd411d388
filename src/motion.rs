use crate::fill::{FillOp, FillRecorder};
use crate::model::{Pose, PoseUpdate};
use crate::overlay::TurtleOverlay;
use crate::pacer::{FramePacer, FRAME_DELAY};
use crate::surface::{point_on_circle, radians, Point, Surface};

/// Degrees advanced per animation step of a rotation.
pub(crate) const ROTATION_SPEED: f64 = 10.0;
/// Distance units (or arc length) advanced per animation step.
pub(crate) const LINEAR_SPEED: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Turn {
    Left,
    Right,
}

/// Everything a primitive touches while it runs. The engine lends out its
/// parts; primitives report the resulting pose instead of mutating one.
pub(crate) struct MotionCtx<'a> {
    pub surface: &'a mut Surface,
    pub overlay: &'a mut TurtleOverlay,
    pub fill: &'a mut FillRecorder,
    pub pacer: &'a mut dyn FramePacer,
}

impl MotionCtx<'_> {
    /// One visible animation step: show the marker at the interim pose,
    /// give the host a frame, take the marker back off.
    fn step(&mut self, interim: &Pose) {
        self.overlay.draw(self.surface, interim);
        if interim.is_animating {
            self.pacer.wait_frame(FRAME_DELAY);
        }
        self.overlay.clear(self.surface);
    }
}

/// Rotate in place, stepping the marker at the angular speed and clamping
/// the final step onto the requested degree.
pub(crate) fn rotate(ctx: &mut MotionCtx, pose: &Pose, degree: f64, turn: Turn) -> PoseUpdate {
    let sign = match turn {
        Turn::Left => 1.0,
        Turn::Right => -1.0,
    };
    let mut swept = 0.0;
    loop {
        swept += ROTATION_SPEED;
        if swept > degree {
            swept = degree;
        }
        let interim = Pose {
            heading: pose.heading + sign * swept,
            ..*pose
        };
        ctx.step(&interim);
        if swept == degree {
            break;
        }
    }
    PoseUpdate::turned(pose.heading + sign * swept)
}

/// Straight motion along the current heading, stroking each step when the
/// pen is on. The final step lands exactly on the destination so repeated
/// addition cannot overshoot it.
pub(crate) fn line(ctx: &mut MotionCtx, pose: &Pose, distance: f64) -> PoseUpdate {
    let (hx, hy) = (radians(pose.heading).cos(), radians(pose.heading).sin());
    let start = Point::new(pose.x, pose.y);
    let dest = Point::new(pose.x + distance * hx, pose.y + distance * hy);
    let dir = if distance > 0.0 { 1.0 } else { -1.0 };

    let mut current = start;
    let mut travelled = 0.0;
    loop {
        travelled += LINEAR_SPEED * dir;
        let next = if travelled.abs() >= distance.abs() {
            travelled = distance;
            dest
        } else {
            Point::new(
                current.x + hx * LINEAR_SPEED * dir,
                current.y + hy * LINEAR_SPEED * dir,
            )
        };
        if pose.is_pen_on {
            ctx.surface
                .draw_line(current, next, pose.color, pose.line_width);
        }
        current = next;
        let interim = Pose {
            x: current.x,
            y: current.y,
            ..*pose
        };
        ctx.step(&interim);
        if travelled == distance {
            break;
        }
    }

    if pose.is_filling {
        ctx.fill.record(FillOp::Line {
            from: start,
            to: current,
            color: pose.color,
        });
    }
    PoseUpdate::moved(current.x, current.y)
}

/// Arc tangent to the current heading. The center sits one radius to the
/// turtle's left; a negative extent sweeps the other way round.
pub(crate) fn circle(ctx: &mut MotionCtx, pose: &Pose, radius: f64, extent: f64) -> PoseUpdate {
    let start_deg = pose.heading - 90.0;
    let end_deg = start_deg + extent;
    let anticlockwise = extent < 0.0;
    let center = Point::new(
        pose.x + radius * radians(start_deg + 180.0).cos(),
        pose.y + radius * radians(start_deg + 180.0).sin(),
    );

    let arc_len = radians(extent.abs()) * radius;
    let steps = (arc_len / LINEAR_SPEED).ceil() as i64;
    if steps > 0 {
        let angle_step = extent / steps as f64;
        let mut current_deg = start_deg;
        for _ in 0..steps {
            if pose.is_pen_on {
                ctx.surface.draw_arc(
                    center,
                    radius,
                    current_deg,
                    current_deg + angle_step,
                    pose.color,
                    pose.line_width,
                );
            }
            current_deg += angle_step;
            let marker = point_on_circle(center, radius, current_deg);
            let interim = Pose {
                x: marker.x,
                y: marker.y,
                heading: current_deg + 90.0,
                ..*pose
            };
            ctx.step(&interim);
        }
    }

    let end = point_on_circle(center, radius, end_deg);
    if pose.is_filling {
        ctx.fill.record(FillOp::Arc {
            center,
            radius,
            start_deg,
            end_deg,
            anticlockwise,
            from: Point::new(pose.x, pose.y),
            to: end,
            color: pose.color,
        });
    }
    PoseUpdate::arced(end.x, end.y, end_deg + 90.0)
}

/// Chain of arcs with the radius growing by a fixed stride, each sweeping
/// the same angular stride, every iteration starting where the previous one
/// ended.
pub(crate) fn spiral_circle(
    ctx: &mut MotionCtx,
    pose: &Pose,
    steps: u32,
    start_radius: f64,
    radius_stride: f64,
    angle_stride: f64,
) -> PoseUpdate {
    let mut current = *pose;
    for i in 0..steps {
        let radius = start_radius + f64::from(i) * radius_stride;
        let after = circle(ctx, &current, radius, angle_stride);
        current = current.merged(after);
        ctx.step(&current);
    }
    PoseUpdate::arced(current.x, current.y, current.heading)
}

/// Chain of forward-then-left pairs with the forward distance growing by a
/// fixed stride.
pub(crate) fn spiral_forward(
    ctx: &mut MotionCtx,
    pose: &Pose,
    steps: u32,
    start_arc_length: f64,
    arc_length_stride: f64,
    angle_stride: f64,
) -> PoseUpdate {
    let mut current = *pose;
    for i in 0..steps {
        let distance = start_arc_length + f64::from(i) * arc_length_stride;
        let after = line(ctx, &current, distance);
        current = current.merged(after);
        let after = rotate(ctx, &current, angle_stride, Turn::Left);
        current = current.merged(after);
    }
    PoseUpdate::arced(current.x, current.y, current.heading)
}
