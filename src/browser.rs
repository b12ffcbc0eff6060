//! Browser plumbing: streaming fetch, timers and scrolling.
//!
//! Native builds (server rendering, unit tests) get inert stand-ins; none of
//! these are reached outside event handlers and effects.

use leptos::prelude::*;

use crate::error::ChatError;
use crate::ollama::ChatMessage;
#[cfg(target_arch = "wasm32")]
use crate::scroll::IdleCheck;
use crate::scroll::{IdleDebounce, Viewport};
use crate::stream::StreamFrame;

/// Local wall-clock time as `HH:MM`.
pub fn clock_label() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        let now = js_sys::Date::new_0();
        format!("{:02}:{:02}", now.get_hours(), now.get_minutes())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        String::new()
    }
}

pub fn viewport(el: &web_sys::Element) -> Viewport {
    Viewport {
        scroll_top: el.scroll_top() as f64,
        scroll_height: el.scroll_height() as f64,
        client_height: el.client_height() as f64,
    }
}

/// Scroll `el` to its end on the next animation frame, once the DOM has
/// caught up with the latest content.
pub fn scroll_to_bottom(el: &web_sys::Element, smooth: bool) {
    #[cfg(target_arch = "wasm32")]
    {
        let el = el.clone();
        request_animation_frame(move || {
            let opts = web_sys::ScrollToOptions::new();
            opts.set_top(el.scroll_height() as f64);
            opts.set_behavior(if smooth {
                web_sys::ScrollBehavior::Smooth
            } else {
                web_sys::ScrollBehavior::Auto
            });
            el.scroll_to_with_scroll_to_options(&opts);
        });
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (el, smooth);
    }
}

/// Milliseconds since the epoch.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        0.0
    }
}

/// Call `on_idle` once `idle_ms` pass without another call for the same
/// `slot`. Timers are never cleared, so every callback runs and is freed;
/// once the owner of `slot` is disposed a pending timer does nothing.
pub fn debounce_idle(slot: StoredValue<IdleDebounce>, idle_ms: u64, on_idle: impl Fn() + Copy + 'static) {
    let arm = slot.try_update_value(|d| d.touch(now_ms())).unwrap_or(false);
    if arm {
        schedule_idle_check(slot, idle_ms, std::time::Duration::from_millis(idle_ms), on_idle);
    }
}

#[cfg(target_arch = "wasm32")]
fn schedule_idle_check(
    slot: StoredValue<IdleDebounce>,
    idle_ms: u64,
    wait: std::time::Duration,
    on_idle: impl Fn() + Copy + 'static,
) {
    set_timeout(
        move || match slot.try_update_value(|d| d.check(now_ms(), idle_ms as f64)) {
            Some(IdleCheck::Idle) => on_idle(),
            Some(IdleCheck::Wait(ms)) => {
                schedule_idle_check(slot, idle_ms, std::time::Duration::from_millis(ms.ceil() as u64), on_idle)
            }
            None => {}
        },
        wait,
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn schedule_idle_check(
    _slot: StoredValue<IdleDebounce>,
    _idle_ms: u64,
    _wait: std::time::Duration,
    _on_idle: impl Fn() + Copy + 'static,
) {
}

/// POST the conversation to the relay and hand every decoded frame to
/// `on_frame` as it arrives.
#[cfg(target_arch = "wasm32")]
pub async fn stream_chat(
    model: &str,
    messages: &[ChatMessage],
    mut on_frame: impl FnMut(StreamFrame),
) -> Result<(), ChatError> {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    use crate::stream::FrameDecoder;

    let window = web_sys::window().ok_or_else(|| ChatError::Unreachable("no window".into()))?;

    let opts = web_sys::RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(
        &serde_json::json!({ "model": model, "messages": messages }).to_string(),
    ));
    let headers = web_sys::Headers::new().map_err(js_error)?;
    headers.set("Content-Type", "application/json").map_err(js_error)?;
    opts.set_headers(&headers);

    let request = web_sys::Request::new_with_str_and_init("/api/chat", &opts).map_err(js_error)?;
    let resp = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| ChatError::Unreachable(format!("{e:?}")))?;
    let resp: web_sys::Response = resp.dyn_into().map_err(js_error)?;

    if !resp.ok() {
        return Err(ChatError::Status {
            status: resp.status(),
            body: resp.status_text(),
        });
    }
    let Some(body) = resp.body() else {
        return Ok(());
    };
    let reader: web_sys::ReadableStreamDefaultReader = body.get_reader().unchecked_into();

    let mut decoder = FrameDecoder::new();
    loop {
        let chunk = JsFuture::from(reader.read()).await.map_err(js_error)?;
        let done = js_sys::Reflect::get(&chunk, &JsValue::from_str("done")).map_err(js_error)?;
        if done.as_bool().unwrap_or(true) {
            break;
        }
        let value = js_sys::Reflect::get(&chunk, &JsValue::from_str("value")).map_err(js_error)?;
        let bytes = js_sys::Uint8Array::new(&value).to_vec();
        for frame in decoder.push_bytes(&bytes) {
            on_frame(frame);
        }
    }
    for frame in decoder.finish() {
        on_frame(frame);
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn stream_chat(
    _model: &str,
    _messages: &[ChatMessage],
    _on_frame: impl FnMut(StreamFrame),
) -> Result<(), ChatError> {
    Err(ChatError::Unreachable("chat streaming runs in the browser".into()))
}

#[cfg(target_arch = "wasm32")]
fn js_error(value: wasm_bindgen::JsValue) -> ChatError {
    ChatError::Stream(format!("{value:?}"))
}
