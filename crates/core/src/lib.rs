//! PrintForge Core - Shared types library.
//!
//! This crate provides common types used across all PrintForge components:
//! - `checkout` - Quote-and-checkout workflow library
//! - `cli` - Command-line front end for the quote service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, and print parameters

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
