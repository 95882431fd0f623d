//! Prompter for an attended terminal, backed by `dialoguer`.

use std::io;

use console::Term;
use dialoguer::{Confirm, Input};

use gitresolve_core::errors::PromptError;
use gitresolve_core::prompt::{choice_hint, Choice, Prompter};

use crate::style;

pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

/// End of input and interruption both mean the user gave no answer.
fn map_dialoguer(err: dialoguer::Error) -> Result<(), PromptError> {
    match err {
        dialoguer::Error::IO(e)
            if matches!(
                e.kind(),
                io::ErrorKind::UnexpectedEof | io::ErrorKind::Interrupted
            ) =>
        {
            Ok(())
        }
        other => Err(PromptError::Terminal(other.to_string())),
    }
}

impl Prompter for TerminalPrompter {
    fn choose(
        &mut self,
        prompt: &str,
        choices: &[Choice],
        default: Option<char>,
    ) -> Result<Option<char>, PromptError> {
        if choices.is_empty() {
            return Ok(None);
        }

        let answer = Input::<String>::new()
            .with_prompt(format!("{} {}", prompt, choice_hint(choices, default)))
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), String> {
                let input = input.trim();
                if (input.is_empty() && default.is_some())
                    || choices.iter().any(|c| c.matches(input))
                {
                    Ok(())
                } else {
                    Err(format!("\"{}\" is not a valid choice.", input))
                }
            })
            .interact_text_on(&self.term);

        match answer {
            Ok(text) if text.trim().is_empty() => Ok(default),
            Ok(text) => Ok(choices.iter().find(|c| c.matches(&text)).map(|c| c.key)),
            Err(e) => map_dialoguer(e).map(|()| None),
        }
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, PromptError> {
        match Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact_on_opt(&self.term)
        {
            Ok(answer) => Ok(answer),
            Err(e) => map_dialoguer(e).map(|()| None),
        }
    }

    fn notify(&mut self, message: &str) {
        // Notices are best effort; a closed terminal surfaces at the next prompt.
        let _ = self.term.write_line(&style::bold(message));
    }
}
