//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Reader data model and unified result model (ResultItem)
//! - Glob construction from configured extensions and excludes
//! - Language classification and prompt encoding
//! - Token counting for LLM context budgeting
//! - Rendering functions for different output formats
//! - Path normalization and file reading

pub mod encode;
pub mod error;
pub mod file_reader;
pub mod language;
pub mod model;
pub mod paths;
pub mod patterns;
pub mod render;
pub mod tokenizer;
pub mod util;
