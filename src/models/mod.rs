//! Simulation domain models.
//!
//! # Domain Mappings
//!
//! | fcfs-sim | Cloud rendering | Operating system |
//! |----------|-----------------|------------------|
//! | Task | Render job | Process |
//! | VirtualMachine | Render VM | CPU core |
//! | TaskRecord | Job report row | Process accounting entry |

mod machine;
mod record;
mod task;

pub use machine::VirtualMachine;
pub use record::TaskRecord;
pub use task::{Placement, Task, TaskStatus};
