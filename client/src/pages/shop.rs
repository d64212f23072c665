//! Public product catalogue.

use eyeclinic::ApiError;
use eyeclinic::lifetime::Lifetime;
use eyeclinic::resources::{Product, ResourceKind, fetch_list};
use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::pages::dashboard::ResourcePage;
use crate::state::auth::use_auth;

#[component]
pub fn ShopPage() -> impl IntoView {
    view! { <ResourcePage kind=ResourceKind::Products title="Shop"/> }
}

/// Single product looked up from the public catalogue by `:id`.
#[component]
pub fn ProductPage() -> impl IntoView {
    let auth = use_auth();
    let params = use_params_map();
    let lifetime = Lifetime::new();
    on_cleanup({
        let lifetime = lifetime.clone();
        move || lifetime.end()
    });

    let product = LocalResource::new(move || {
        let id = params.read().get("id").unwrap_or_default();
        let store = auth.store();
        let lifetime = lifetime.clone();
        async move {
            let store = store.ok_or(ApiError::Cancelled)?;
            let products = lifetime
                .scope(fetch_list::<Product, _>(store.api(), None, None))
                .await
                .unwrap_or(Err(ApiError::Cancelled))?;
            Ok::<_, ApiError>(products.into_iter().find(|p| p.id == id))
        }
    });

    view! {
        <section class="product-page">
            <Suspense fallback=|| view! { <p>"Loading..."</p> }>
                {move || {
                    product.get().map(|result| match result {
                        Ok(Some(p)) => view! {
                            <h1>{p.name.clone()}</h1>
                            <p class="product-page__brand">{p.brand.clone().unwrap_or_default()}</p>
                            <p class="product-page__price">{format!("${:.2}", p.price)}</p>
                        }
                        .into_any(),
                        Ok(None) => view! { <p>"Product not found."</p> }.into_any(),
                        Err(ApiError::Cancelled) => ().into_any(),
                        Err(e) => view! { <p class="resource-page__error">{e.user_message()}</p> }.into_any(),
                    })
                }}
            </Suspense>
        </section>
    }
}
