//! Flows module - Operations combining the core with the host collaborators
//!
//! Provides:
//! - read: Gather repository files into a token budget
//! - inspect: Show the resolved configuration and search globs

pub mod inspect;
pub mod read;
