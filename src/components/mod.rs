mod chat;
mod chat_bubble;
mod model_selector;
mod prompt_input;

pub use chat::Chat;
pub use chat_bubble::ChatBubble;
pub use model_selector::ModelSelector;
pub use prompt_input::PromptInput;
