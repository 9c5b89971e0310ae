//! Outline text parsing and rendering.
//!
//! Outline files are plain UTF-8 text:
//!
//! ```text
//! COURSE: Rust Fundamentals
//! ==========================
//! 1. Week 1
//!    1.1. Ownership
//!    1.2. Borrowing
//! 2. Week 2
//!    2.1. Traits
//! ```
//!
//! Parsing is tolerant: anything that is not a course, section or lesson line is
//! skipped. Only a missing course title fails the whole file.

mod parser;
pub mod tree_render;

pub use parser::*;

/// Filename suffix identifying outline files.
pub const OUTLINE_SUFFIX: &str = "_outline.txt";
