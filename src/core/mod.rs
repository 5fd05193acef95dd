//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Cart data model (line items, catalog items, snapshots)
//! - Exact money arithmetic
//! - Rendering functions for different output formats
//! - State directory paths

pub mod model;
pub mod money;
pub mod paths;
pub mod render;
