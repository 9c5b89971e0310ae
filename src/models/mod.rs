//! Domain models for outline imports.
//!
//! # Core Concepts
//!
//! ## Source Tree
//!
//! - [`OutlineNode`]: A course, section or lesson parsed from outline text. The course
//!   owns its sections, sections own their lessons, and sibling order is file order.
//!
//! ## Import Bookkeeping
//!
//! These exist only for the lifetime of one import run:
//!
//! - [`ImportOperation`]: One planned page creation, immutable once planned.
//! - [`ImportResult`]: The outcome of attempting one operation in one pass.
//! - [`ImportSession`]: Cumulative state across passes (what was created, what failed last).

mod operation;
mod outline;
mod result;
mod session;

pub use operation::*;
pub use outline::*;
pub use result::*;
pub use session::*;
