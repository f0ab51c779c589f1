//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Redirect, Route, Router, Routes},
};

use crate::components::navbar::Navbar;
use crate::components::network_banner::NetworkBanner;
use crate::components::protected::Protected;
use crate::pages::{
    admin_dashboard::AdminDashboardPage, dashboard::DashboardPage, login::LoginPage, not_found::NotFoundPage,
};
use crate::state::auth::AuthContext;
use crate::util::session_driver::install_session_driver;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the auth context, starts the session driver and sets up routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = AuthContext::new();
    provide_context(auth);
    install_session_driver(auth);

    // Effects only run in the browser, where storage exists.
    Effect::new(move || auth.restore());

    view! {
        <Stylesheet id="leptos" href="/pkg/satdash.css"/>
        <Title text="Satellite Data System"/>

        <Router>
            <Navbar/>
            <NetworkBanner/>
            <main class="app-main">
                <Routes fallback=|| view! { <NotFoundPage/> }>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route
                        path=StaticSegment("dashboard")
                        view=|| view! { <Protected><DashboardPage/></Protected> }
                    />
                    <Route
                        path=StaticSegment("admin-dashboard")
                        view=|| view! { <Protected admin_only=true><AdminDashboardPage/></Protected> }
                    />
                    <Route path=StaticSegment("") view=|| view! { <Redirect path="/dashboard"/> }/>
                </Routes>
            </main>
        </Router>
    }
}
