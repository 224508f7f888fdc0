//! Human-in-the-loop prompts.
//!
//! The workflow asks three kinds of questions: a yes/no install offer, a
//! numbered directory choice, and a "press Enter" acknowledgment after each
//! preview. All of them go through [`Prompt`] so front ends and tests can
//! answer them without a terminal.

use crate::error::{CoreError, CoreResult};

use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Source of answers to interactive questions.
pub trait Prompt {
    /// Asks a yes/no question. Anything other than a yes counts as no.
    fn confirm(&self, question: &str) -> CoreResult<bool>;

    /// Shows `options` as a numbered list and returns the zero-based index
    /// of the chosen one.
    fn choose(&self, title: &str, options: &[String]) -> CoreResult<usize>;

    /// Blocks until the user acknowledges `message`.
    fn acknowledge(&self, message: &str) -> CoreResult<()>;
}

/// Prompt over a line-oriented reader and writer, by default stdin/stdout.
pub struct StdioPrompt<R, W> {
    io: Mutex<(R, W)>,
}

impl StdioPrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> StdioPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    fn ask(&self, text: &str) -> CoreResult<String> {
        let mut guard = self
            .io
            .lock()
            .map_err(|_| CoreError::OperationFailed("prompt lock poisoned".to_string()))?;
        let (reader, writer) = &mut *guard;

        write!(writer, "{text}")?;
        writer.flush()?;

        let mut line = String::new();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            return Err(CoreError::InvalidSelection(
                "input closed before an answer was given".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }

    fn say(&self, text: &str) -> CoreResult<()> {
        let mut guard = self
            .io
            .lock()
            .map_err(|_| CoreError::OperationFailed("prompt lock poisoned".to_string()))?;
        writeln!(guard.1, "{text}")?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Prompt for StdioPrompt<R, W> {
    fn confirm(&self, question: &str) -> CoreResult<bool> {
        let answer = self.ask(&format!("{question} (y/n) "))?;
        Ok(is_yes(&answer))
    }

    fn choose(&self, title: &str, options: &[String]) -> CoreResult<usize> {
        self.say(title)?;
        for (idx, option) in options.iter().enumerate() {
            self.say(&format!("{}: {}", idx + 1, option))?;
        }
        let answer = self.ask("Enter the number of the folder: ")?;
        parse_choice(&answer, options.len())
    }

    fn acknowledge(&self, message: &str) -> CoreResult<()> {
        // EOF also releases the gate
        match self.ask(&format!("{message} ")) {
            Ok(_) | Err(CoreError::InvalidSelection(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// True for `y` / `yes` in any case.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Parses a one-based menu answer into a zero-based index.
pub fn parse_choice(answer: &str, option_count: usize) -> CoreResult<usize> {
    let number: usize = answer
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidSelection(format!("'{}' is not a number", answer.trim())))?;

    if number == 0 || number > option_count {
        return Err(CoreError::InvalidSelection(format!(
            "{number} is not between 1 and {option_count}"
        )));
    }
    Ok(number - 1)
}
