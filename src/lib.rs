//! wmts-cache - disk cache for WMTS documents and tiles
//!
//! wmts-cache provides:
//! - Deterministic cache paths for capability documents and tiles
//! - Four tile layouts (tc, mp, tms, reverse_tms)
//! - A serving-path filter that never fails the request
//! - A management API and admin commands to inspect and purge the cache

pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod core;
pub mod logging;
