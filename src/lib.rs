//! Batch import of course outlines into Microsoft OneNote.
//!
//! The pipeline runs leaf-first:
//!
//! 1. [`outline`] parses outline text into a course tree.
//! 2. [`naming`] resolves display titles for tree nodes.
//! 3. [`planner`] flattens a selection of the tree into ordered create operations.
//! 4. [`executor`] runs passes of those operations against a [`graph::PageStore`],
//!    folding results into a caller-owned [`models::ImportSession`].
//! 5. [`progress`] summarizes the session between passes.
//!
//! [`pages`] supplies title lists for flat page batches that skip the outline.
//! [`workflow`] ties passes together with caller-supplied retry decisions, and
//! [`auth`] supplies bearer tokens.

pub mod auth;
pub mod config;
pub mod executor;
pub mod graph;
pub mod models;
pub mod naming;
pub mod outline;
pub mod pages;
pub mod planner;
pub mod progress;
pub mod workflow;
