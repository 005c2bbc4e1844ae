//! Script and interactive front ends over a [`Session`].

use crate::session::{Session, SessionError};
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

pub const EXIT_COMMANDS: &[&str] = &["exit", "quit"];

const PROMPT: &str = "> ";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line} `{command}`: {source}")]
    Script {
        line: usize,
        command: String,
        #[source]
        source: SessionError,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'l> {
    Command(&'l str),
    /// Empty line or `#` comment.
    Blank,
    Exit,
}

fn classify_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        Input::Blank
    } else if EXIT_COMMANDS.contains(&trimmed) {
        Input::Exit
    } else {
        Input::Command(trimmed)
    }
}

/// Feeds lines to a session and routes results to `out`, failures to `err`.
pub struct Runner<'s> {
    session: &'s Session,
    out: fn(&str),
    err: fn(&str),
}

impl<'s> Runner<'s> {
    pub fn new(session: &'s Session) -> Self {
        Self::with_output(session, |msg| println!("{msg}"), |msg| eprintln!("{msg}"))
    }

    pub fn with_output(session: &'s Session, out: fn(&str), err: fn(&str)) -> Self {
        Self { session, out, err }
    }

    pub fn print(&self, message: &str) {
        (self.out)(message);
    }

    /// Execute a script, stopping at the first failing command. Returns the
    /// number of commands run.
    pub async fn run_script(&self, path: &Path) -> Result<usize, CliError> {
        let content = tokio::fs::read_to_string(path).await?;
        let mut executed = 0;

        for (index, line) in content.lines().enumerate() {
            let command = match classify_input(line) {
                Input::Command(command) => command,
                Input::Blank => continue,
                Input::Exit => break,
            };
            let result = self
                .session
                .execute_line(command)
                .map_err(|source| CliError::Script {
                    line: index + 1,
                    command: command.to_string(),
                    source,
                })?;
            (self.out)(&result);
            executed += 1;
        }

        debug!(path = %path.display(), executed, "Script finished");
        Ok(executed)
    }

    /// Prompt loop over `input` until EOF, an exit command or Ctrl-C. Failed
    /// commands are reported and the loop continues. Returns the number of
    /// commands run.
    pub async fn run_interactive<R>(&self, input: R, banner: &[&str]) -> Result<usize, CliError>
    where
        R: AsyncBufRead + Unpin,
    {
        for line in banner {
            (self.out)(line);
        }

        let mut lines = input.lines();
        let mut executed = 0;
        loop {
            print!("{PROMPT}");
            io::stdout().flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            };
            let Some(line) = line else { break };

            match classify_input(&line) {
                Input::Command(command) => {
                    executed += 1;
                    match self.session.execute_line(command) {
                        Ok(result) => (self.out)(&result),
                        Err(err) => (self.err)(&format!("Error: {err}")),
                    }
                }
                Input::Blank => continue,
                Input::Exit => break,
            }
        }
        Ok(executed)
    }
}
