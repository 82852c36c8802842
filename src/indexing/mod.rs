//! File enumeration for source and classpath roots
//!
//! Both the source-root walk (Kotlin files) and the class-directory walk
//! (`.class` files) go through the same collector so that enumeration order
//! is the same everywhere: sorted by path, hidden entries skipped.

mod files;

pub use files::{collect_files, should_skip_path};
