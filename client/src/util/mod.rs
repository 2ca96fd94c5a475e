//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate environment concerns (wall clock) and pure form
//! rules from page logic to improve reuse and testability.

pub mod clock;
pub mod validation;
