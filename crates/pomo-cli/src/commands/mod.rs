pub mod analyze;
pub mod goals;
pub mod report;
pub mod timer;
