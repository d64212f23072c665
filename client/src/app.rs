//! Root application component with routing and context providers.

use eyeclinic::resources::ResourceKind;
use eyeclinic::routes::{ADMIN_ONLY, CLIENT_ONLY, DOCTOR_ONLY, Layout};
use eyeclinic::{Role, SessionStore};
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::{Outlet, ParentRoute, Redirect, Route, Router, Routes};
use leptos_router::path;

use crate::components::guard::{GuestOnly, NavigationBridge, RequireAuth};
use crate::components::layout::PortalLayout;
use crate::components::toast::ToastStack;
use crate::net::api::BrowserApi;
use crate::pages::dashboard::{DashboardPage, ResourcePage};
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::not_found::NotFoundPage;
use crate::pages::profile::ProfilePage;
use crate::pages::register::RegisterPage;
use crate::pages::shop::{ProductPage, ShopPage};
use crate::pages::unauthorized::UnauthorizedPage;
use crate::state::auth::AuthContext;
use crate::state::toast::ToastState;
use crate::util::storage::BrowserStorage;

/// Root application component.
///
/// Owns the session store for the lifetime of the page and sets up
/// client-side routing. Every route is wrapped in the guard its entry in
/// `eyeclinic::routes::ROUTES` names.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let toasts = RwSignal::new(ToastState::default());
    provide_context(toasts);
    AuthContext::install(SessionStore::new(BrowserApi::from_build_env(), BrowserStorage), toasts);

    view! {
        <Title text="Eye Clinic"/>

        <Router>
            <NavigationBridge/>
            <ToastStack/>
            <Routes fallback=|| view! { <NotFoundPage/> }>
                <Route path=path!("/") view=|| view! { <PortalLayout layout=Layout::Public><HomePage/></PortalLayout> }/>
                <Route
                    path=path!("/unauthorized")
                    view=|| view! { <PortalLayout layout=Layout::Public><UnauthorizedPage/></PortalLayout> }
                />
                <Route path=path!("/shop") view=|| view! { <PortalLayout layout=Layout::Public><ShopPage/></PortalLayout> }/>
                <Route
                    path=path!("/shop/:id")
                    view=|| view! { <PortalLayout layout=Layout::Public><ProductPage/></PortalLayout> }
                />
                <Route path=path!("/login") view=|| view! { <GuestOnly><LoginPage/></GuestOnly> }/>
                <Route path=path!("/register") view=|| view! { <GuestOnly><RegisterPage/></GuestOnly> }/>

                <ParentRoute path=path!("/admin") view=AdminSection>
                    <Route path=path!("") view=|| view! { <Redirect path=Role::Admin.home_route()/> }/>
                    <Route path=path!("dashboard") view=|| view! { <DashboardPage/> }/>
                    <Route path=path!("users") view=|| view! { <ResourcePage kind=ResourceKind::Users title="Users"/> }/>
                    <Route
                        path=path!("products")
                        view=|| view! { <ResourcePage kind=ResourceKind::Products title="Products"/> }
                    />
                    <Route path=path!("orders") view=|| view! { <ResourcePage kind=ResourceKind::Orders title="Orders"/> }/>
                    <Route
                        path=path!("appointments")
                        view=|| view! { <ResourcePage kind=ResourceKind::Appointments title="Appointments"/> }
                    />
                    <Route path=path!("reports") view=|| view! { <DashboardPage/> }/>
                </ParentRoute>

                <ParentRoute path=path!("/doctor") view=DoctorSection>
                    <Route path=path!("") view=|| view! { <Redirect path=Role::Doctor.home_route()/> }/>
                    <Route path=path!("dashboard") view=|| view! { <DashboardPage/> }/>
                    <Route
                        path=path!("appointments")
                        view=|| view! { <ResourcePage kind=ResourceKind::Appointments title="Appointments"/> }
                    />
                    <Route
                        path=path!("prescriptions")
                        view=|| view! { <ResourcePage kind=ResourceKind::Prescriptions title="Prescriptions"/> }
                    />
                    <Route
                        path=path!("patients")
                        view=|| view! { <ResourcePage kind=ResourceKind::Appointments title="Patients"/> }
                    />
                </ParentRoute>

                <ParentRoute path=path!("/client") view=ClientSection>
                    <Route path=path!("") view=|| view! { <Redirect path=Role::Client.home_route()/> }/>
                    <Route path=path!("dashboard") view=|| view! { <DashboardPage/> }/>
                    <Route
                        path=path!("appointments")
                        view=|| view! { <ResourcePage kind=ResourceKind::Appointments title="My Appointments"/> }
                    />
                    <Route
                        path=path!("orders")
                        view=|| view! { <ResourcePage kind=ResourceKind::Orders title="My Orders"/> }
                    />
                    <Route
                        path=path!("prescriptions")
                        view=|| view! { <ResourcePage kind=ResourceKind::Prescriptions title="My Prescriptions"/> }
                    />
                    <Route path=path!("cart") view=|| view! { <ShopPage/> }/>
                </ParentRoute>

                <Route
                    path=path!("/profile")
                    view=|| view! { <RequireAuth><PortalLayout layout=Layout::Account><ProfilePage/></PortalLayout></RequireAuth> }
                />
                <Route
                    path=path!("/notifications")
                    view=|| {
                        view! {
                            <RequireAuth>
                                <PortalLayout layout=Layout::Account>
                                    <ResourcePage kind=ResourceKind::Notifications title="Notifications"/>
                                </PortalLayout>
                            </RequireAuth>
                        }
                    }
                />
            </Routes>
        </Router>
    }
}

#[component]
fn AdminSection() -> impl IntoView {
    view! {
        <RequireAuth roles=ADMIN_ONLY>
            <PortalLayout layout=Layout::Admin><Outlet/></PortalLayout>
        </RequireAuth>
    }
}

#[component]
fn DoctorSection() -> impl IntoView {
    view! {
        <RequireAuth roles=DOCTOR_ONLY>
            <PortalLayout layout=Layout::Doctor><Outlet/></PortalLayout>
        </RequireAuth>
    }
}

#[component]
fn ClientSection() -> impl IntoView {
    view! {
        <RequireAuth roles=CLIENT_ONLY>
            <PortalLayout layout=Layout::Client><Outlet/></PortalLayout>
        </RequireAuth>
    }
}
