use anyhow::Result;
use inquire::InquireError;

/// Source of answers for interactive prompts.
pub trait PromptDriver {
    /// Asks for a line of text. `Ok(None)` means the user wants to stop.
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<Option<String>>;
}

/// Prompts on the terminal with `inquire`.
pub struct InquireDriver;

impl PromptDriver for InquireDriver {
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<Option<String>> {
        let mut prompt = inquire::Text::new(title);
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        if !default.is_empty() {
            prompt = prompt.with_default(default);
        }

        match prompt.prompt_skippable() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
