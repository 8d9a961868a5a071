//! Domain models for the crosscheck engine.

mod drug;
mod interaction;
mod report;
mod schedule;

pub use drug::*;
pub use interaction::*;
pub use report::*;
pub use schedule::*;
