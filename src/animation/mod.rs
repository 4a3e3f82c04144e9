pub mod task;
pub mod transition;

pub use task::{Clock, ManualClock, SystemClock, TaskId, Timeline};
pub use transition::{interpolate, AngularExtent, ArcTween, Lerp};
