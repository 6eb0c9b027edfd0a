use anyhow::{bail, Result};
use console::Term;
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal, Write};

pub trait Prompt {
    /// Returns the answer with surrounding whitespace removed. Empty
    /// answers are allowed.
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// dialoguer on a terminal, plain line reads from stdin otherwise so piped
/// answers work.
pub struct TerminalPrompt {
    interactive: bool,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            interactive: Term::stderr().is_term() && io::stdin().is_terminal(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        if !self.interactive {
            let stdin = io::stdin();
            return LinePrompt::new(stdin.lock(), io::stderr()).ask(question);
        }

        let answer = Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer.trim().to_string())
    }
}

pub struct LinePrompt<R, W> {
    input: R,
    echo: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, echo: W) -> Self {
        Self { input, echo }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.echo, "{}: ", question)?;
        self.echo.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input closed while waiting for: {}", question);
        }
        Ok(line.trim().to_string())
    }
}

pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}
