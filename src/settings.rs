use serde::{Deserialize, Serialize};

/// Externally supplied configuration, read once when the engine is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleSettings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Marker triangle width, in surface units.
    pub turtle_width: f64,
    /// Marker triangle height, in surface units.
    pub turtle_height: f64,
    /// Whether the host pins the surface in place. The engine carries the
    /// flag for the host; it does not affect rendering.
    pub fixed_position: bool,
    pub debug_logging: bool,
}

impl Default for TurtleSettings {
    fn default() -> Self {
        Self {
            canvas_width: 320,
            canvas_height: 320,
            turtle_width: 10.0,
            turtle_height: 15.0,
            fixed_position: true,
            debug_logging: false,
        }
    }
}
