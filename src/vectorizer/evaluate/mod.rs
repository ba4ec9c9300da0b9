pub mod explain;
pub mod scoring;
