pub mod js;
pub mod errors;

pub use errors::to_job_error;
