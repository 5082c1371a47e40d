//! Common utilities for the sift selector engine.
//!
//! This crate provides shared infrastructure used by all sift components:
//! - **Warning System** - deduplicated reporting of unsupported selector features

pub mod warning;
