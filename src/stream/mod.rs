//! Stream combinators for packet delivery

mod throttle;

pub use throttle::{Throttle, ThrottleExt};
