//! Storage Module
//!
//! Classification, display formatting and availability of a machine's
//! disks, partitions and filesystems.

pub mod available;
pub mod classifier;
pub mod format;
pub mod machine;

pub use available::*;
pub use classifier::*;
pub use format::*;
pub use machine::*;
