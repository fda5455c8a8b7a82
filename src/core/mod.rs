//! Core module - addressing engine and output model
//!
//! This module provides:
//! - Digests for projects, documents and tile variants
//! - Tile layouts mapping coordinates to paths
//! - Typed tile request parameters
//! - Unified result model and renderers for the admin commands
//! - Path utilities

pub mod digest;
pub mod layout;
pub mod model;
pub mod paths;
pub mod render;
pub mod request;
