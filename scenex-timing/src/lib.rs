pub mod timeout;
pub mod timer;

pub use timeout::{TimeoutId, TimeoutQueue};
pub use timer::{CalibrationStats, HighPrecisionTimer, ManualTimer, Timer};
