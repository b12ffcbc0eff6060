use leptos::prelude::*;

/// Single-line prompt box. Enter or the send button submits; the box is
/// cleared either way.
#[component]
pub fn PromptInput(on_submit: Callback<String>, #[prop(into)] disabled: Signal<bool>) -> impl IntoView {
    let (draft, set_draft) = signal(String::new());

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let prompt = draft.get_untracked();
        set_draft.set(String::new());
        on_submit.run(prompt);
    };

    view! {
        <form class="chat-input-area" on:submit=submit>
            <fieldset disabled=move || disabled.get()>
                <input
                    id="prompt-input"
                    type="text"
                    name="prompt"
                    autocomplete="off"
                    placeholder="Type your message..."
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                />
                <button id="send-button" type="submit" class:inert=move || disabled.get()>
                    "➤"
                </button>
            </fieldset>
        </form>
    }
}
