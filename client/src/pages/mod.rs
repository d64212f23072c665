//! Route-level page components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages are mounted by the router inside their guard and layout. They read
//! the session from `AuthContext` and never decide access themselves.

pub mod dashboard;
pub mod home;
pub mod login;
pub mod not_found;
pub mod profile;
pub mod register;
pub mod shop;
pub mod unauthorized;
