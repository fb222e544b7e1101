//! Exam Result Utility Functions
//!
//! ## Current API
//!
//! - Compute component scoring (total + percentage)
//! - Advance a result through its evaluation lifecycle
//! - Classify a result as pass/fail
//! - Grade objective answers against the question bank
//! - Validate exam configuration
//!
pub mod answers;
pub mod error;
pub mod lifecycle;
pub mod misc;
pub mod scoring;
