use leptos::prelude::*;

pub fn is_selected_model(selected: Option<&str>, model: &str) -> bool {
    selected == Some(model)
}

/// Dropdown of installed models. Closes on selection, on a click outside,
/// and on Escape. Locked while a reply is streaming.
#[component]
pub fn ModelSelector(
    #[prop(into)] models: Signal<Vec<String>>,
    #[prop(into)] selected: Signal<Option<String>>,
    on_change: Callback<String>,
    #[prop(into)] disabled: Signal<bool>,
) -> impl IntoView {
    let (open, set_open) = signal(false);

    #[cfg(target_arch = "wasm32")]
    {
        let handle = window_event_listener(leptos::ev::keydown, move |ev| {
            if ev.key() == "Escape" {
                set_open.set(false);
            }
        });
        on_cleanup(move || handle.remove());
    }

    let toggle = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        if !disabled.get_untracked() {
            set_open.update(|o| *o = !*o);
        }
    };

    view! {
        <div class="menu-backdrop"
             class:hidden=move || !open.get()
             on:click=move |_| set_open.set(false)>
        </div>

        <div class="model-dropdown">
            <button id="model-button"
                    type="button"
                    class:open=move || open.get()
                    disabled=move || disabled.get()
                    title=move || {
                        if disabled.get() { "Cannot change model while thinking" } else { "Select a model" }
                    }
                    on:click=toggle>
                <span class="model-button-label">
                    {move || selected.get().unwrap_or_else(|| "Select model...".to_string())}
                </span>
                <span class="chevron" class:rotated=move || open.get()>"▾"</span>
            </button>

            <div id="model-menu"
                 class="model-menu"
                 class:hidden=move || !open.get()
                 on:click=move |ev: web_sys::MouseEvent| ev.stop_propagation()>
                <For
                    each=move || models.get()
                    key=|model| model.clone()
                    children=move |model| {
                        let name = model.clone();
                        let is_selected = {
                            let model = model.clone();
                            Memo::new(move |_| selected.with(|s| is_selected_model(s.as_deref(), &model)))
                        };
                        view! {
                            <button type="button"
                                    class="model-option"
                                    class:selected=is_selected
                                    on:click=move |_| {
                                        on_change.run(model.clone());
                                        set_open.set(false);
                                    }>
                                <span class="model-name">{name}</span>
                                <span class="model-check" class:hidden=move || !is_selected.get()>"✓"</span>
                            </button>
                        }
                    }
                />
            </div>
        </div>
    }
}
