//! Result aggregation modules
//!
//! Final result and metadata types produced by the extraction pipeline.

pub mod result;
