//! Toast notifications raised by session events.
//!
//! SYSTEM CONTEXT
//! ==============
//! Notices from the session store (login success, validation failures,
//! logout) are pushed here and rendered by `ToastStack`. Each toast is
//! dismissed by click or after `TOAST_TTL_MS`.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use eyeclinic::session::{Notice, NoticeLevel};
use leptos::prelude::*;

/// Visible lifetime of a toast.
pub const TOAST_TTL_MS: u32 = 4_000;

/// Oldest toasts are dropped beyond this many.
pub const MAX_TOASTS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

impl Toast {
    /// CSS modifier for the toast level.
    pub fn class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Success => "toast toast--success",
            NoticeLevel::Info => "toast toast--info",
            NoticeLevel::Error => "toast toast--error",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToastState {
    pub items: Vec<Toast>,
    next_id: u64,
}

impl ToastState {
    /// Append `notice` and return the new toast's id.
    pub fn push(&mut self, notice: Notice) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast { id, level: notice.level, message: notice.message });
        if self.items.len() > MAX_TOASTS {
            let excess = self.items.len() - MAX_TOASTS;
            self.items.drain(..excess);
        }
        id
    }

    /// Remove the toast with `id`; unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }
}

/// Dismiss toast `id` after `TOAST_TTL_MS`.
pub fn schedule_dismiss(toasts: RwSignal<ToastState>, id: u64) {
    #[cfg(feature = "csr")]
    {
        gloo_timers::callback::Timeout::new(TOAST_TTL_MS, move || {
            let _ = toasts.try_update(|t| t.dismiss(id));
        })
        .forget();
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (toasts, id);
    }
}
