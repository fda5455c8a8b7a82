//! Cache module - Manages the on-disk WMTS cache
//!
//! Provides:
//! - Cache store (paths, read/write/delete, enumeration)
//! - Root metadata and configuration
//! - Serving-path filter for host servers

pub mod config;
pub mod error;
pub mod filter;
pub mod meta;
pub mod store;
