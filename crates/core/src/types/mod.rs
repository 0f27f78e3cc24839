//! Core types for PrintForge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod print;

pub use id::*;
pub use money::Money;
pub use print::{Color, Dimensions, Material, ParseEnumError};
