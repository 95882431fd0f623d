//! Interactive prompting.
//!
//! The resolver talks to the user only through the [`Prompter`] trait so it
//! can be driven by scripted answers in tests. [`LinePrompter`] is the plain
//! line-based implementation used when input is not a terminal.

use std::io::{BufRead, Write};

use crate::errors::PromptError;

/// One selectable answer: a single-character key plus a full word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub key: char,
    pub word: &'static str,
}

impl Choice {
    pub const fn new(key: char, word: &'static str) -> Self {
        Self { key, word }
    }

    /// Whether `input` selects this choice, ignoring case and surrounding
    /// whitespace.
    pub fn matches(&self, input: &str) -> bool {
        let input = input.trim();
        let mut chars = input.chars();
        let is_key = matches!(
            (chars.next(), chars.next()),
            (Some(c), None) if c.to_lowercase().eq(self.key.to_lowercase())
        );
        is_key || input.eq_ignore_ascii_case(self.word)
    }
}

/// Capability used by the resolver to interact with the user.
pub trait Prompter {
    /// Ask the user to pick one of `choices`.
    ///
    /// Empty input selects `default` when one is given. Returns `Ok(None)`
    /// when no usable answer can be obtained, e.g. on end of input.
    fn choose(
        &mut self,
        prompt: &str,
        choices: &[Choice],
        default: Option<char>,
    ) -> Result<Option<char>, PromptError>;

    /// Ask a yes/no question. Returns `Ok(None)` on end of input.
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, PromptError> {
        let default_key = if default { 'y' } else { 'n' };
        let answer = self.choose(prompt, &YES_NO, Some(default_key))?;
        Ok(answer.map(|key| key == 'y'))
    }

    /// Show an informational message.
    fn notify(&mut self, message: &str);
}

/// Answers accepted by [`Prompter::confirm`].
pub const YES_NO: [Choice; 2] = [Choice::new('y', "yes"), Choice::new('n', "no")];

/// Format the choice hint, capitalizing the default, e.g. `[E/s/q]`.
pub fn choice_hint(choices: &[Choice], default: Option<char>) -> String {
    let keys: Vec<String> = choices
        .iter()
        .map(|c| {
            if Some(c.key) == default {
                c.key.to_uppercase().to_string()
            } else {
                c.key.to_string()
            }
        })
        .collect();
    format!("[{}]", keys.join("/"))
}

/// Line-based prompter over any reader/writer pair.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn choose(
        &mut self,
        prompt: &str,
        choices: &[Choice],
        default: Option<char>,
    ) -> Result<Option<char>, PromptError> {
        if choices.is_empty() {
            return Ok(None);
        }

        loop {
            write!(self.output, "{} {} ", prompt, choice_hint(choices, default))?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(None);
            }

            let response = line.trim();
            if response.is_empty() {
                match default {
                    Some(key) => return Ok(Some(key)),
                    None => continue,
                }
            }

            if let Some(choice) = choices.iter().find(|c| c.matches(response)) {
                return Ok(Some(choice.key));
            }

            writeln!(self.output, "\"{}\" is not a valid choice.", response)?;
            writeln!(self.output)?;
        }
    }

    fn notify(&mut self, message: &str) {
        let _ = writeln!(self.output, "{}", message);
    }
}
