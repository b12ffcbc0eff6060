use leptos::prelude::*;

/// One message in the transcript. `html` is already-rendered markdown.
#[component]
pub fn ChatBubble(
    #[prop(optional)] is_user: bool,
    #[prop(into)] stamp: String,
    #[prop(optional)] thinking: bool,
    #[prop(into)] html: String,
) -> impl IntoView {
    view! {
        <article class="chat-bubble" class:user-bubble=is_user class:ai-bubble=!is_user>
            <p class="bubble-header">
                <span class="bubble-author">{if is_user { "You" } else { "AI Agent" }}</span>
                <span class="bubble-stamp">{stamp}</span>
            </p>
            {if thinking {
                view! { <p class="thinking">"Thinking..."</p> }.into_any()
            } else {
                view! { <div class="markdown-content" inner_html=html></div> }.into_any()
            }}
        </article>
    }
}
