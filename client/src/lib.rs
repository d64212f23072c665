//! # client
//!
//! Leptos + WASM frontend for the Eye Clinic portal.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store, guards and route table live in the `eyeclinic` core
//! crate. This crate supplies the browser transport (`gloo-net`), the
//! `localStorage` backend, and the components that render guard decisions.
//!
//! Built with `trunk` and the `csr` feature. Without `csr` the crate still
//! compiles natively; the transport and storage then report `Unavailable`.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::prelude::mount_to_body(app::App);
}
