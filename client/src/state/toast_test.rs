use super::*;

// =============================================================
// push / dismiss
// =============================================================

#[test]
fn push_assigns_increasing_ids() {
    let mut state = ToastState::default();
    let a = state.push(Notice::success("Login successful"));
    let b = state.push(Notice::error("Invalid credentials"));
    assert!(b > a);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[1].level, NoticeLevel::Error);
}

#[test]
fn dismiss_removes_only_matching_toast() {
    let mut state = ToastState::default();
    let a = state.push(Notice::info("one"));
    let b = state.push(Notice::info("two"));
    state.dismiss(a);
    assert_eq!(state.items.iter().map(|t| t.id).collect::<Vec<_>>(), vec![b]);
    state.dismiss(a);
    assert_eq!(state.items.len(), 1);
}

#[test]
fn push_drops_oldest_beyond_cap() {
    let mut state = ToastState::default();
    for i in 0..(MAX_TOASTS + 2) {
        state.push(Notice::info(format!("n{i}")));
    }
    assert_eq!(state.items.len(), MAX_TOASTS);
    assert_eq!(state.items[0].message, "n2");
}

#[test]
fn ids_are_not_reused_after_dismiss() {
    let mut state = ToastState::default();
    let a = state.push(Notice::info("one"));
    state.dismiss(a);
    let b = state.push(Notice::info("two"));
    assert_ne!(a, b);
}

// =============================================================
// class
// =============================================================

#[test]
fn class_reflects_level() {
    let mut state = ToastState::default();
    state.push(Notice::error("bad"));
    assert_eq!(state.items[0].class(), "toast toast--error");
}
