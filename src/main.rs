#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::routing::post;
    use axum::Router;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use ochat::app::*;
    use ochat::config::OllamaConfig;
    use ochat::ollama::OllamaClient;
    use ochat::relay::{chat_relay, AppState};
    use tower_http::services::ServeDir;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let conf = match get_configuration(None) {
        Ok(conf) => conf,
        Err(e) => {
            log::error!("invalid leptos configuration: {e}");
            std::process::exit(1);
        }
    };
    let addr = conf.leptos_options.site_addr;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(App);

    let ollama = OllamaClient::new(OllamaConfig::from_env());
    log::info!("relaying chat to {}", ollama.config().base_url);

    let state = AppState {
        leptos_options: leptos_options.clone(),
        ollama: ollama.clone(),
    };

    let app = Router::new()
        .route("/api/chat", post(chat_relay))
        .nest_service(
            "/pkg",
            ServeDir::new(format!("{}/pkg", &leptos_options.site_root)).append_index_html_on_directories(false),
        )
        .leptos_routes_with_context(
            &state,
            routes,
            move || provide_context(ollama.clone()),
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("cannot bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    log::info!("listening on http://{}", &addr);
    if let Err(e) = axum::serve(listener, app).await {
        log::error!("server error: {e}");
    }
}

#[cfg(not(feature = "ssr"))]
pub fn main() {}
