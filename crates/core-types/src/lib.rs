pub mod calendar;
pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use calendar::{month_start, MonthlyCalendar};
pub use enums::{Direction, Momentum, NormaliseMethod, Transform};
pub use error::CoreError;
pub use structs::{Observation, ScoreSeries};
