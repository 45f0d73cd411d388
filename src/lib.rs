pub mod color;
pub mod crop;
pub mod export;
pub mod fill;
pub mod logging;
pub mod model;
mod motion;
pub mod overlay;
pub mod pacer;
pub mod replay;
pub mod settings;
pub mod surface;

pub use color::Color;
pub use model::{Command, CommandKind, FontSpec, Pose, PoseUpdate, TextAlign};
pub use pacer::{CountingPacer, FramePacer, SleepPacer, FRAME_DELAY};
pub use replay::{CommandLog, CommandSource, ReplayState, TurtleEngine};
pub use settings::TurtleSettings;
pub use surface::{PixelRegion, Point, Surface};
