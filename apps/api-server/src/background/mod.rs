//! In-process background work.

mod scheduler;

pub use scheduler::{Scheduler, SchedulerConfig, schedule_generation};
