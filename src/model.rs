use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Full turtle state at one point in the command log.
///
/// Every command embeds the producer-side pose at issue time; the replay
/// loop replaces its working pose wholesale from the command and then merges
/// the executed primitive's [`PoseUpdate`] on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in degrees, counter-clockwise, 0 = east.
    pub heading: f64,
    pub is_pen_on: bool,
    pub is_filling: bool,
    pub is_animating: bool,
    pub is_turtle_on: bool,
    /// Stroke color.
    pub color: Color,
    pub fill_color: Color,
    pub line_width: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            heading: 90.0,
            is_pen_on: true,
            is_filling: false,
            is_animating: false,
            is_turtle_on: true,
            color: Color::BLACK,
            fill_color: Color::BLACK,
            line_width: 1.0,
        }
    }
}

impl Pose {
    /// Apply a primitive's partial result on top of this pose.
    pub fn merged(&self, update: PoseUpdate) -> Self {
        Self {
            x: update.x.unwrap_or(self.x),
            y: update.y.unwrap_or(self.y),
            heading: update.heading.unwrap_or(self.heading),
            ..*self
        }
    }
}

/// Partial pose returned by a motion primitive.
///
/// Primitives never mutate the shared pose; they report where the motion
/// ended and the replay loop performs the merge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub heading: Option<f64>,
}

impl PoseUpdate {
    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            heading: None,
        }
    }

    pub fn turned(heading: f64) -> Self {
        Self {
            x: None,
            y: None,
            heading: Some(heading),
        }
    }

    pub fn arced(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            heading: Some(heading),
        }
    }
}

/// Horizontal anchor for `write` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// `(family, size, weight)` font descriptor, serialised as a 3-element
/// array like `["Arial", 8, "normal"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec(pub String, pub f64, pub String);

impl FontSpec {
    pub fn family(&self) -> &str {
        &self.0
    }

    pub fn size(&self) -> f64 {
        self.1
    }

    pub fn weight(&self) -> &str {
        &self.2
    }
}

/// Type-specific payload of a command.
///
/// The wire tag is the camelCase `type` field of the original protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CommandKind {
    Reset,
    UpdateTurtle,
    BeginFill,
    EndFill,
    Left {
        degree: f64,
    },
    Right {
        degree: f64,
    },
    Write {
        text: String,
        align: TextAlign,
        font: FontSpec,
    },
    #[serde(rename_all = "camelCase")]
    Dot {
        size: f64,
        /// Absent or null on the wire means the dot inherits the fill color.
        #[serde(default)]
        dot_color: Option<Color>,
    },
    Line {
        distance: f64,
    },
    Circle {
        radius: f64,
        extent: f64,
    },
    #[serde(rename_all = "camelCase")]
    SpiralCircle {
        steps: u32,
        start_radius: f64,
        radius_stride: f64,
        angle_stride: f64,
    },
    #[serde(rename_all = "camelCase")]
    SpiralForward {
        steps: u32,
        start_arc_length: f64,
        arc_length_stride: f64,
        angle_stride: f64,
    },
}

/// One entry of the append-only command log.
///
/// Ids are strictly increasing; an id at or below the last-processed one is
/// ignored on replay, so re-reading the log from the start never
/// double-applies a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: u64,
    #[serde(flatten)]
    pub pose: Pose,
    #[serde(flatten)]
    pub kind: CommandKind,
}
