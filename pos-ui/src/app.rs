//! App Root Component
//!
//! Main application component with routing, route guards and global
//! providers.

use leptos::*;
use leptos_router::*;
use pos_client::routes::{resolve_access, Guard, Route as Page};

use crate::components::{Loading, Nav, Toast};
use crate::pages::{
    Admin, Audit, Cash, Categories, Dashboard, Login, NewProduct, Pos, Profile, Promotions,
    SalesToday, Stock,
};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let logged_in = state.logged_in;

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                // Navigation header, only with a session
                {move || logged_in.get().then(|| view! { <Nav /> })}

                <main class="flex-1 container mx-auto px-4 py-8">
                    <Routes>
                        <Route path="/login" view=|| view! { <Gate page=Page::Login><Login /></Gate> } />
                        <Route path="/pos" view=|| view! { <Gate page=Page::Pos><Pos /></Gate> } />
                        <Route path="/ventas/hoy" view=|| view! { <Gate page=Page::SalesToday><SalesToday /></Gate> } />
                        <Route path="/caja" view=|| view! { <Gate page=Page::Cash><Cash /></Gate> } />
                        <Route path="/stock" view=|| view! { <Gate page=Page::Stock><Stock /></Gate> } />
                        <Route path="/productos/nuevo" view=|| view! { <Gate page=Page::NewProduct><NewProduct /></Gate> } />
                        <Route path="/promos" view=|| view! { <Gate page=Page::Promotions><Promotions /></Gate> } />
                        <Route path="/categorias" view=|| view! { <Gate page=Page::Categories><Categories /></Gate> } />
                        <Route path="/dashboard" view=|| view! { <Gate page=Page::Dashboard><Dashboard /></Gate> } />
                        <Route path="/bitacora" view=|| view! { <Gate page=Page::Audit><Audit /></Gate> } />
                        <Route path="/admin" view=|| view! { <Gate page=Page::Admin><Admin /></Gate> } />
                        <Route path="/perfil" view=|| view! { <Gate page=Page::Profile><Profile /></Gate> } />
                        <Route path="/" view=|| view! { <Redirect path=Page::Login.path() /> } />
                        <Route path="/*any" view=|| view! { <Redirect path=Page::Login.path() /> } />
                    </Routes>
                </main>

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Renders the page only while its access rule allows it
///
/// Re-evaluated whenever the session or the current user changes, so an
/// expired session sends the visitor back to the login page.
#[component]
fn Gate(page: Page, children: ChildrenFn) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let logged_in = state.logged_in;
    let me = state.me;
    let me_loading = state.me_loading;

    let guard = create_memo(move |_| {
        let current = me.get();
        resolve_access(page, logged_in.get(), current.as_ref(), me_loading.get())
    });

    move || {
        match guard.get() {
            Guard::Allow => children().into_view(),
            Guard::Redirect(target) => view! { <Redirect path=target.path() /> }.into_view(),
            Guard::Pending => view! { <Loading /> }.into_view(),
        }
    }
}
