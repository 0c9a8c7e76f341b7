pub mod assistant;
pub use assistant::{AssistantError, AssistantService, TextGenerator, parse_model_json};

pub mod prompts;
