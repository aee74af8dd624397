use crate::map::{MapError, MapShape};

use super::Window;

/// Errors that can occur while reducing a map
#[derive(Debug, thiserror::Error)]
pub enum ReductionError {
    /// Window is not strictly smaller than the map on both axes
    #[error("Window dimension too large: {window} window on a {shape} map")]
    WindowTooLarge {
        /// Configured window
        window: Window,
        /// Shape of the map at the failing iteration
        shape: MapShape,
    },

    /// Window cannot make progress (zero side or a single cell)
    #[error("Degenerate window {0}")]
    DegenerateWindow(Window),

    /// Threshold fraction is not inside `[0, 1]`
    #[error("Threshold fraction {0} outside [0, 1]")]
    InvalidThreshold(f64),

    /// Reduced map could not be assembled
    #[error("Map error: {0}")]
    Map(#[from] MapError),
}
