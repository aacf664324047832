//! `stockroom-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

extern crate self as stockroom_core;

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};

#[doc(hidden)]
pub use serde;
#[doc(hidden)]
pub use uuid;
