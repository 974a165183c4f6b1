extern crate colored;
#[doc(hidden)]
pub extern crate inventory;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;

#[macro_use] pub mod helpers;
pub mod auto_register;
pub mod context;
pub mod registry;
pub mod reporter;
pub mod test_case;

pub use auto_register::AutoRegister;
pub use context::{check, require, ExecutionContext};
pub use registry::{Registry, RunSummary};
pub use reporter::{Reporter, Severity};
pub use test_case::{FailSignal, TestCase, TestError, TestOutcome, TestResult};
