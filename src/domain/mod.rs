//! Domain layer - Machine storage snapshot records
//!
//! Typed versions of the disk, partition, filesystem and machine records the
//! classifier works on.

pub mod models;

pub use models::*;
