pub mod driver;
pub mod process;
pub mod timeline;
pub mod workload;

pub use driver::{Schedule, Sim, compare_policies, simulate};
pub use process::{Process, ProcessEntry, ProcessResult, number_entries, validate};
pub use timeline::{GanttBlock, Timeline};
pub use workload::{BernoulliParams, bernoulli_workload};
