//! Shared utility modules.

pub mod validation;
