//! Decision-provider boundary for interactive prompts.
//!
//! The core never touches a terminal directly: anything that would have been
//! an interactive question (keep or overwrite a table, default or custom
//! CREATE statement, replacement database name) goes through this trait so
//! policy is injectable and the provisioning logic is testable headless.

use std::io::{BufRead, Write};

use crate::error::{Result, SinkError};

/// Answer to a binary question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// The `0` answer; also the fallback after repeated invalid input
    Default,
    /// The `1` answer
    Alternate,
}

/// Supplies answers to the questions the loader would otherwise ask a human.
pub trait DecisionProvider {
    /// Asks a binary question, `0` (default) or `1` (alternate).
    ///
    /// # Errors
    /// Returns an error only when the underlying input channel fails.
    fn ask_binary(&mut self, prompt: &str) -> Result<Choice>;

    /// Asks for a free-text answer (e.g. a custom CREATE statement).
    ///
    /// # Errors
    /// Returns an error only when the underlying input channel fails.
    fn ask_free_text(&mut self, prompt: &str) -> Result<String>;
}

/// Interactive provider reading from stdin.
///
/// Binary questions are asked up to three times; after three answers that are
/// neither `0` nor `1`, the default wins.
#[derive(Debug, Default)]
pub struct StdinDecisions;

impl StdinDecisions {
    fn read_line(prompt: &str) -> Result<String> {
        print!("{prompt}");
        std::io::stdout()
            .flush()
            .map_err(|e| SinkError::io("failed to flush prompt", e))?;

        let mut line = String::new();
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| SinkError::io("failed to read from stdin", e))?;
        Ok(line.trim().to_string())
    }
}

impl DecisionProvider for StdinDecisions {
    fn ask_binary(&mut self, prompt: &str) -> Result<Choice> {
        for _ in 0..3 {
            match Self::read_line(prompt)?.as_str() {
                "0" => return Ok(Choice::Default),
                "1" => return Ok(Choice::Alternate),
                _ => {}
            }
        }
        Ok(Choice::Default)
    }

    fn ask_free_text(&mut self, prompt: &str) -> Result<String> {
        Self::read_line(prompt)
    }
}

/// Non-interactive provider: every binary question gets the default answer
/// and free-text questions get an empty string. Selected by the loader's
/// `--non-interactive` flag.
#[derive(Debug, Default)]
pub struct AssumeDefaults;

impl DecisionProvider for AssumeDefaults {
    fn ask_binary(&mut self, _prompt: &str) -> Result<Choice> {
        Ok(Choice::Default)
    }

    fn ask_free_text(&mut self, _prompt: &str) -> Result<String> {
        Ok(String::new())
    }
}

/// Scripted provider for tests: answers are consumed in order, falling back
/// to the defaults once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedDecisions {
    binary: std::collections::VecDeque<Choice>,
    free_text: std::collections::VecDeque<String>,
    /// Prompts seen so far, in order
    pub asked: Vec<String>,
}

impl ScriptedDecisions {
    /// Creates a provider with queued binary and free-text answers.
    #[must_use]
    pub fn new(binary: Vec<Choice>, free_text: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            free_text: free_text.into(),
            asked: Vec::new(),
        }
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn ask_binary(&mut self, prompt: &str) -> Result<Choice> {
        self.asked.push(prompt.to_string());
        Ok(self.binary.pop_front().unwrap_or(Choice::Default))
    }

    fn ask_free_text(&mut self, prompt: &str) -> Result<String> {
        self.asked.push(prompt.to_string());
        Ok(self.free_text.pop_front().unwrap_or_default())
    }
}
