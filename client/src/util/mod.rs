//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage) and pure form/nav
//! logic from page and component code to improve reuse and testability.

pub mod form;
pub mod nav;
pub mod storage;
