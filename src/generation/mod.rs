//! Answer generation: prompt assembly and canned small-talk replies

pub mod canned;
pub mod prompt;

pub use canned::check_common_question;
pub use prompt::PromptBuilder;
