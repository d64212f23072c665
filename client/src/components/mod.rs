//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render portal chrome and guard decisions while reading
//! shared auth and toast state from Leptos context providers.

pub mod field;
pub mod guard;
pub mod layout;
pub mod toast;
