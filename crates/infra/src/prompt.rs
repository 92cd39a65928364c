//! Console confirmation prompt

use std::io::{self, BufRead, BufReader, Write};
use std::sync::Mutex;

use dirgraph_core::ConfirmationPrompt;
use dirgraph_domain::{DirectoryError, Result};

use crate::errors::InfraError;

/// Asks on a writer and reads the answer from a reader.
///
/// Only `y` and `yes` (any case) confirm; anything else, including end of
/// input, declines.
pub struct ConsolePrompt<R, W> {
    io: Mutex<(R, W)>,
}

impl ConsolePrompt<BufReader<io::Stdin>, io::Stderr> {
    /// Prompt on stderr, answer on stdin.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R, W> ConsolePrompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { io: Mutex::new((reader, writer)) }
    }

    /// Recover the reader and writer, e.g. to inspect what was written.
    pub fn into_inner(self) -> (R, W) {
        match self.io.into_inner() {
            Ok(io) => io,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn ask(&self, message: &str) -> io::Result<bool> {
        let mut guard = match self.io.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("prompt mutex poisoned, recovering");
                poisoned.into_inner()
            }
        };
        let (reader, writer) = &mut *guard;

        write!(writer, "{message} [y/N] ")?;
        writer.flush()?;

        let mut answer = String::new();
        reader.read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

impl<R, W> ConfirmationPrompt for ConsolePrompt<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn confirm(&self, message: &str) -> Result<bool> {
        let confirmed = self.ask(message).map_err(|err| DirectoryError::from(InfraError::from(err)))?;
        tracing::debug!(confirmed, "confirmation answered");
        Ok(confirmed)
    }
}
