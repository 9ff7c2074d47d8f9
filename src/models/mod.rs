pub mod backend;
pub mod result;
pub mod status;

pub use backend::Backend;
pub use result::{ErrorInfo, Location, RunOutput, Summary, TestResult};
pub use status::TestStatus;
