//! Job shop domain models.
//!
//! Provides the instance data consumed by construction and the schedule
//! (Gantt chart) it produces.
//!
//! # Domain Mappings
//!
//! | u-paco | Manufacturing | Construction graph |
//! |--------|---------------|--------------------|
//! | Job | Order / routing | Chain of nodes |
//! | Operation | Routing step | Node `job * machines + k` |
//! | Schedule | Production plan | Side product of one walk |

mod instance;
mod job;
mod schedule;

pub use instance::JsspInstance;
pub use job::{Job, Operation};
pub use schedule::{Schedule, ScheduledOperation};
