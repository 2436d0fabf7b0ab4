//! Stream combinators for display feeds

mod throttle;

pub use throttle::{Throttle, ThrottleExt};
