use leptos::prelude::*;
use leptos_meta::{provide_meta_context, MetaTags, Stylesheet, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    path,
};

use crate::components::Chat;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1, viewport-fit=cover"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Stylesheet id="leptos" href="/pkg/ochat.css"/>
        <Title text="ochat"/>

        <Router>
            <div class="page">
                <a href="https://github.com/imreyesjorge/ochat" class="project-link" title="ochat on GitHub">
                    "◉"
                </a>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=path!("") view=Chat/>
                </Routes>
            </div>
        </Router>
    }
}
