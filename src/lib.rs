pub mod api;
pub mod app;
pub mod browser;
pub mod components;
pub mod config;
pub mod conversation;
pub mod error;
pub mod markdown;
pub mod ollama;
#[cfg(feature = "ssr")]
pub mod relay;
pub mod scroll;
pub mod status;
pub mod stream;

use crate::app::*;
use leptos::prelude::*;
use wasm_bindgen::prelude::wasm_bindgen;

#[wasm_bindgen]
pub fn hydrate() {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        _ = console_log::init_with_level(log::Level::Debug);
        leptos::mount::hydrate_body(App);
    }
}
