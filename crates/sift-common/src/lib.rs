//! Common utilities for the sift selector engine.
//!
//! This crate provides shared infrastructure used by every sift component:
//! - **Warning System** - deduplicated, coloured diagnostics on stderr for
//!   selector constructs that are accepted but can never match

pub mod warning;
