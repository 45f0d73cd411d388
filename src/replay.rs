use crate::color::Color;
use crate::crop::crop_to_content;
use crate::export::encode_png;
use crate::fill::{FillOp, FillRecorder};
use crate::model::{Command, CommandKind, FontSpec, Pose, PoseUpdate, TextAlign};
use crate::motion::{self, MotionCtx, Turn};
use crate::overlay::TurtleOverlay;
use crate::pacer::{FramePacer, SleepPacer, FRAME_DELAY};
use crate::settings::TurtleSettings;
use crate::surface::{PixelRegion, Point, Surface};
use anyhow::Result;
use std::cell::{Cell, RefCell};
use tracing::{debug, trace};

/// Where the append-only command log comes from.
///
/// The engine re-reads the full sequence on every pump and filters by id, so
/// producers only ever append. `is_attached` reports whether the host
/// surface still exists; once it turns false the current drain stops early.
pub trait CommandSource {
    fn commands(&self) -> Vec<Command>;

    fn is_attached(&self) -> bool {
        true
    }
}

/// In-memory command log with interior mutability, usable as the store
/// behind a host binding and as a test double.
#[derive(Debug)]
pub struct CommandLog {
    commands: RefCell<Vec<Command>>,
    attached: Cell<bool>,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self {
            commands: RefCell::new(Vec::new()),
            attached: Cell::new(true),
        }
    }
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, command: Command) {
        self.commands.borrow_mut().push(command);
    }

    pub fn set_attached(&self, attached: bool) {
        self.attached.set(attached);
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CommandSource for CommandLog {
    fn commands(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }
}

/// Replay loop state. `pump` is reentrancy-guarded: a pump that arrives
/// while another is draining returns immediately, and appends that land
/// mid-drain are picked up by the running drain's re-check instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    Idle,
    Draining,
}

/// The command replay and raster-animation engine.
///
/// Owns the surface, the pose, the overlay and the fill recorder; consumes
/// the unseen suffix of a [`CommandSource`] in id order with at-most-once
/// semantics per id.
pub struct TurtleEngine<P = SleepPacer> {
    settings: TurtleSettings,
    surface: Surface,
    overlay: TurtleOverlay,
    fill: FillRecorder,
    pacer: P,
    pose: Pose,
    last_command_id: u64,
    state: ReplayState,
    base: PixelRegion,
}

impl TurtleEngine<SleepPacer> {
    pub fn new(settings: TurtleSettings) -> Self {
        Self::with_pacer(settings, SleepPacer)
    }
}

impl<P: FramePacer> TurtleEngine<P> {
    /// Build the engine: allocate the surface, capture the pristine base
    /// snapshot and show the marker at the home pose.
    pub fn with_pacer(settings: TurtleSettings, pacer: P) -> Self {
        crate::logging::init(settings.debug_logging);
        let mut surface = Surface::new(settings.canvas_width, settings.canvas_height);
        let base = surface.snapshot_full();
        let mut overlay = TurtleOverlay::new(settings.turtle_width, settings.turtle_height);
        let pose = Pose::default();
        overlay.draw(&mut surface, &pose);
        Self {
            settings,
            surface,
            overlay,
            fill: FillRecorder::default(),
            pacer,
            pose,
            last_command_id: 0,
            state: ReplayState::Idle,
            base,
        }
    }

    pub fn settings(&self) -> &TurtleSettings {
        &self.settings
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn last_command_id(&self) -> u64 {
        self.last_command_id
    }

    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Drain every unseen command from the source.
    ///
    /// Called on each change notification from the host. Commands are
    /// processed in ascending id order; ids at or below the last processed
    /// one are skipped, so replaying a log from the start never
    /// double-applies. After the suffix is exhausted the source is read
    /// again, and the drain keeps going while producers appended behind it.
    pub fn pump(&mut self, source: &dyn CommandSource) {
        if self.state == ReplayState::Draining {
            return;
        }
        self.state = ReplayState::Draining;

        loop {
            let pending: Vec<Command> = source
                .commands()
                .into_iter()
                .filter(|c| c.id > self.last_command_id)
                .collect();
            if pending.is_empty() {
                break;
            }
            debug!(count = pending.len(), "draining commands");

            for command in pending {
                if !source.is_attached() {
                    // The host surface is gone; stop where we are. The next
                    // pump after reattachment resumes behind the same id.
                    debug!(id = command.id, "host detached, aborting drain");
                    self.state = ReplayState::Idle;
                    return;
                }
                if command.id <= self.last_command_id {
                    continue;
                }
                self.last_command_id = command.id;
                trace!(id = command.id, "applying command");

                self.pose = command.pose;
                self.overlay.clear(&mut self.surface);
                let update = self.dispatch(&command);
                self.pose = command.pose.merged(update);
                self.overlay.draw(&mut self.surface, &self.pose);
                if command.pose.is_animating {
                    self.pacer.wait_frame(FRAME_DELAY);
                }
            }
        }

        self.state = ReplayState::Idle;
    }

    fn dispatch(&mut self, command: &Command) -> PoseUpdate {
        let pose = command.pose;
        match &command.kind {
            CommandKind::Reset => {
                self.reset();
                PoseUpdate::default()
            }
            CommandKind::UpdateTurtle => PoseUpdate::default(),
            CommandKind::BeginFill => {
                self.begin_fill(&pose);
                PoseUpdate::default()
            }
            CommandKind::EndFill => {
                self.fill.finish(&mut self.surface, &pose);
                PoseUpdate::default()
            }
            CommandKind::Left { degree } => {
                let mut ctx = self.motion_ctx();
                motion::rotate(&mut ctx, &pose, *degree, Turn::Left)
            }
            CommandKind::Right { degree } => {
                let mut ctx = self.motion_ctx();
                motion::rotate(&mut ctx, &pose, *degree, Turn::Right)
            }
            CommandKind::Write { text, align, font } => {
                self.write(&pose, text, *align, font);
                PoseUpdate::default()
            }
            CommandKind::Dot { size, dot_color } => {
                self.dot(&pose, *size, *dot_color);
                PoseUpdate::default()
            }
            CommandKind::Line { distance } => {
                let mut ctx = self.motion_ctx();
                motion::line(&mut ctx, &pose, *distance)
            }
            CommandKind::Circle { radius, extent } => {
                let mut ctx = self.motion_ctx();
                motion::circle(&mut ctx, &pose, *radius, *extent)
            }
            CommandKind::SpiralCircle {
                steps,
                start_radius,
                radius_stride,
                angle_stride,
            } => {
                let mut ctx = self.motion_ctx();
                motion::spiral_circle(
                    &mut ctx,
                    &pose,
                    *steps,
                    *start_radius,
                    *radius_stride,
                    *angle_stride,
                )
            }
            CommandKind::SpiralForward {
                steps,
                start_arc_length,
                arc_length_stride,
                angle_stride,
            } => {
                let mut ctx = self.motion_ctx();
                motion::spiral_forward(
                    &mut ctx,
                    &pose,
                    *steps,
                    *start_arc_length,
                    *arc_length_stride,
                    *angle_stride,
                )
            }
        }
    }

    fn motion_ctx(&mut self) -> MotionCtx<'_> {
        MotionCtx {
            surface: &mut self.surface,
            overlay: &mut self.overlay,
            fill: &mut self.fill,
            pacer: &mut self.pacer,
        }
    }

    /// Discard everything drawn so far, including a fill in progress.
    fn reset(&mut self) {
        self.fill.clear();
        self.surface.restore(&self.base);
    }

    fn begin_fill(&mut self, pose: &Pose) {
        let snapshot = self.surface.snapshot_full();
        self.fill
            .begin(snapshot, Point::new(pose.x, pose.y), pose.color);
    }

    fn write(&mut self, pose: &Pose, text: &str, align: TextAlign, font: &FontSpec) {
        let at = Point::new(pose.x, pose.y);
        self.surface.draw_text(text, at, font, align, pose.color);
        if pose.is_filling {
            self.fill.record(FillOp::Text {
                at,
                text: text.to_owned(),
                align,
                font: font.clone(),
                color: pose.color,
            });
        }
    }

    fn dot(&mut self, pose: &Pose, size: f64, dot_color: Option<Color>) {
        let at = Point::new(pose.x, pose.y);
        let color = dot_color.unwrap_or(pose.fill_color);
        self.surface.draw_dot(at, size, color);
        if pose.is_filling {
            self.fill.record(FillOp::Dot { at, size, color });
        }
    }

    /// Encode the current surface contents as PNG bytes, optionally cropped
    /// to the bounding box of non-transparent pixels.
    pub fn export_png(&self, crop: bool) -> Result<Vec<u8>> {
        if crop {
            encode_png(&crop_to_content(&self.surface)?)
        } else {
            encode_png(&self.surface)
        }
    }
}
