//! Navigation entries for each portal layout, derived from the route table.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use eyeclinic::routes::{Layout, ROUTES, paths};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
}

const PUBLIC_LINKS: &[NavLink] = &[
    NavLink { href: paths::LANDING, label: "Home" },
    NavLink { href: "/shop", label: "Shop" },
];

/// Links shown in the header of `layout`. Role portals list their own
/// pages followed by the shared account pages.
pub fn nav_links(layout: Layout) -> Vec<NavLink> {
    match layout {
        Layout::Public | Layout::Account => PUBLIC_LINKS.to_vec(),
        portal => ROUTES
            .iter()
            .filter(|r| r.layout == portal || r.layout == Layout::Account)
            .filter(|r| !r.path.contains(':') && !r.is_section_root())
            .map(|r| NavLink { href: r.path, label: r.title })
            .collect(),
    }
}
