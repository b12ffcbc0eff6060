use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{check_ollama_status, describe_error, list_ollama_models};
use crate::browser;
use crate::components::{ChatBubble, ModelSelector, PromptInput};
use crate::conversation::Conversation;
use crate::markdown::markdown_to_html;
use crate::scroll::{IdleDebounce, ScrollTracker, SCROLL_IDLE_MS};
use crate::status::ServerStatus;
use crate::stream::StreamFrame;

/// Where the model list stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ModelsState {
    #[default]
    Loading,
    Failed(String),
    Ready(Vec<String>),
}

impl ModelsState {
    pub fn models(&self) -> Vec<String> {
        match self {
            ModelsState::Ready(models) => models.clone(),
            _ => Vec::new(),
        }
    }
}

/// Keep the current pick if the server still has it, otherwise fall back to
/// the first installed model.
pub fn pick_model(current: Option<String>, models: &[String]) -> Option<String> {
    match current {
        Some(model) if models.contains(&model) => Some(model),
        _ => models.first().cloned(),
    }
}

#[component]
pub fn Chat() -> impl IntoView {
    let (status, set_status) = signal(ServerStatus::Trying);
    let (models_state, set_models_state) = signal(ModelsState::Loading);
    let (selected_model, set_selected_model) = signal::<Option<String>>(None);
    let conversation = RwSignal::new(Conversation::new());
    let scroll = RwSignal::new(ScrollTracker::new());
    let scroll_idle = StoredValue::new(IdleDebounce::default());
    let container = NodeRef::<Div>::new();

    let status_resource = Resource::new(|| (), |_| check_ollama_status());
    let models_resource = Resource::new(|| (), |_| list_ollama_models());

    Effect::new(move |_| {
        if let Some(result) = status_resource.get() {
            set_status.set(match result {
                Ok(status) => status,
                Err(e) => {
                    log::warn!("status check failed: {}", describe_error(&e));
                    ServerStatus::Dead
                }
            });
        }
    });

    Effect::new(move |_| {
        match models_resource.get() {
            None => set_models_state.set(ModelsState::Loading),
            Some(Ok(models)) => {
                set_selected_model.update(|current| *current = pick_model(current.take(), &models));
                set_models_state.set(ModelsState::Ready(models));
            }
            Some(Err(e)) => set_models_state.set(ModelsState::Failed(describe_error(&e))),
        }
    });

    let retry_connection = move |_| {
        set_status.set(ServerStatus::Trying);
        status_resource.refetch();
    };

    let retry_models = move |_| {
        set_models_state.set(ModelsState::Loading);
        models_resource.refetch();
        set_status.set(ServerStatus::Trying);
        status_resource.refetch();
    };

    let thinking = Signal::derive(move || conversation.with(|c| c.is_thinking()));
    let models = Signal::derive(move || models_state.with(|s| s.models()));

    // Follow new content down unless the user has scrolled away.
    Effect::new(move |_| {
        conversation.track();
        if scroll.with(|s| s.should_follow()) {
            if let Some(el) = container.get() {
                browser::scroll_to_bottom(&el, true);
            }
        }
    });

    let on_scroll = move |_| {
        let Some(el) = container.get_untracked() else {
            return;
        };
        scroll.maybe_update(|s| s.on_scroll(browser::viewport(&el)));
        browser::debounce_idle(scroll_idle, SCROLL_IDLE_MS, move || {
            scroll.maybe_update(|s| s.on_scroll_idle());
        });
    };

    let jump_to_bottom = move |_| {
        scroll.maybe_update(|s| s.resume());
        if let Some(el) = container.get_untracked() {
            browser::scroll_to_bottom(&el, true);
        }
    };

    let request_reply = move |model: String| {
        let transcript = conversation.with_untracked(|c| c.transcript());
        conversation.update(|c| c.begin_response(browser::clock_label()));
        if let Some(el) = container.get_untracked() {
            scroll.maybe_update(|s| s.on_reply_start(browser::viewport(&el)));
        }

        spawn_local(async move {
            let result = browser::stream_chat(&model, &transcript, |frame| match frame {
                StreamFrame::Delta { content } => conversation.update(|c| c.append_fragment(&content)),
                StreamFrame::Error { message } => log::warn!("reply from {model} failed: {message}"),
                StreamFrame::Done => {}
            })
            .await;
            if let Err(e) = result {
                log::error!("chat stream failed: {e}");
            }
            conversation.update(|c| c.finish_response());
        });
    };

    let send = Callback::new(move |prompt: String| {
        let Some(model) = selected_model.get_untracked() else {
            log::error!("No model selected");
            return;
        };
        let stamp = browser::clock_label();
        let accepted = conversation
            .try_update(|c| c.push_user(&prompt, stamp))
            .unwrap_or(false);
        if !accepted {
            return;
        }
        scroll.maybe_update(|s| s.resume());
        if conversation.with_untracked(|c| c.needs_response()) {
            request_reply(model);
        }
    });

    let select_model = Callback::new(move |model: String| set_selected_model.set(Some(model)));

    move || {
        let models_state = models_state.get();
        let status = status.get();

        match models_state {
            ModelsState::Loading => view! {
                <main class="status-screen">
                    <p class="status-pill pulse">"Loading available models..."</p>
                </main>
            }
            .into_any(),
            ModelsState::Failed(error) => view! {
                <main class="status-screen">
                    <div class="status-stack">
                        <p class="status-pill error">{format!("Failed to load models: {error}")}</p>
                        <button class="retry-button" on:click=retry_models>"Retry"</button>
                    </div>
                </main>
            }
            .into_any(),
            ModelsState::Ready(ref list) if list.is_empty() => view! {
                <main class="status-screen">
                    <div class="status-stack">
                        <p class="status-pill">"No models found. Please install a model using Ollama."</p>
                        <p class="status-hint">"Run: " <code>"ollama pull <model-name>"</code></p>
                    </div>
                </main>
            }
            .into_any(),
            ModelsState::Ready(_) if status.is_trying() => view! {
                <main class="status-screen">
                    <p class="status-pill pulse">"Trying to reach the Ollama server..."</p>
                </main>
            }
            .into_any(),
            ModelsState::Ready(_) if status.is_dead() => view! {
                <main class="status-screen">
                    <div class="status-stack">
                        <p class="status-pill">"Couldn’t connect to the Ollama server."</p>
                        <button class="retry-button" on:click=retry_connection>"Retry"</button>
                    </div>
                </main>
            }
            .into_any(),
            ModelsState::Ready(list) => {
                let count = list.len();
                view! {
                    <main class="chat-container">
                        <div class="chat-header">
                            <ModelSelector
                                models=models
                                selected=selected_model
                                on_change=select_model
                                disabled=thinking
                            />
                            {(count > 1).then(|| view! {
                                <span class="model-count">{format!("☰ {count} models")}</span>
                            })}
                        </div>

                        <div id="chat-window" class="chat-window" node_ref=container on:scroll=on_scroll>
                            <For
                                each=move || conversation.with(|c| c.messages().iter().cloned().enumerate().collect::<Vec<_>>())
                                key=|(index, _)| *index
                                children=move |(_, entry)| {
                                    let is_user = entry.is_user();
                                    let html = markdown_to_html(&entry.content);
                                    view! { <ChatBubble is_user=is_user stamp=entry.stamp html=html/> }
                                }
                            />
                            {move || conversation.with(|c| c.pending().cloned()).map(|reply| view! {
                                <ChatBubble
                                    stamp=reply.stamp
                                    thinking=reply.content.is_empty()
                                    html=markdown_to_html(&reply.content)
                                />
                            })}
                        </div>

                        <button class="scroll-to-bottom"
                                class:hidden=move || scroll.with(|s| s.auto_scroll())
                                aria-label="Scroll to bottom"
                                on:click=jump_to_bottom>
                            "⇊"
                        </button>

                        <PromptInput on_submit=send disabled=thinking/>
                    </main>
                }
                .into_any()
            }
        }
    }
}
