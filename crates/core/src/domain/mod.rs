pub mod estimate;
pub mod job;
