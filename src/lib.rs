//! # eyeclinic
//!
//! Session, authorization and routing core for the Eye Clinic portal.
//!
//! The clinic backend is an external REST service. This crate owns the
//! client-side half of the contract: who is logged in, how that survives a
//! restart, and which routes a given session may see. Both the Leptos
//! frontend (`client/`) and the command-line client (`cli/`) build on it.
//!
//! ARCHITECTURE
//! ============
//! Leaves first: `storage` → `api` → `session` → `guard` → `routes`.
//! `session::SessionStore` is the only stateful piece; guards and the route
//! table are pure functions over a `Session` snapshot.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod lifetime;
pub mod resources;
pub mod role;
pub mod routes;
pub mod session;
pub mod storage;
pub mod types;

pub use error::ApiError;
pub use guard::GuardDecision;
pub use role::Role;
pub use session::{Session, SessionEvent, SessionStore};
pub use types::{Credentials, RegisterRequest, User};
