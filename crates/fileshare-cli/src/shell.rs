//! Interactive shell: one typed line is one UI event, run to completion
//! before the next line is read.

use std::io::{self, IsTerminal, Write};

use clap::Parser;
use fileshare_core::auth::AuthBackend;
use fileshare_core::storage::StorageBackend;
use fileshare_core::{ActionDispatcher, FileRecord, SessionState, SessionStore};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{split_line, ShellCommand, ShellLine};
use crate::error::CliError;

const PROMPT: &str = "fileshare> ";

/// What the loop does after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(Vec<String>),
    Exit,
}

pub struct Shell<A: AuthBackend, S: StorageBackend> {
    pub(crate) session: SessionStore<A>,
    pub(crate) dispatcher: ActionDispatcher<S>,
    /// Listing from the last successful refresh.
    pub(crate) listing: Vec<FileRecord>,
}

impl<A: AuthBackend, S: StorageBackend> Shell<A, S> {
    pub const fn new(auth: A, storage: S) -> Self {
        Self {
            session: SessionStore::new(auth),
            dispatcher: ActionDispatcher::new(storage),
            listing: Vec::new(),
        }
    }

    pub async fn execute(&mut self, command: ShellCommand) -> Result<Flow, CliError> {
        let result = match command {
            ShellCommand::Signup { email, password } => self.run_signup(&email, &password).await,
            ShellCommand::Login { email, password } => self.run_login(&email, &password).await,
            ShellCommand::Logout => Ok(self.run_logout().await),
            ShellCommand::Whoami => self.run_whoami(),
            ShellCommand::Upload {
                path,
                name,
                content_type,
            } => {
                self.run_upload(&path, name.as_deref(), content_type.as_deref())
                    .await
            }
            ShellCommand::Refresh { json } => self.run_refresh(json).await,
            ShellCommand::Ls { json } => self.run_ls(json),
            ShellCommand::Preview { name } => self.run_preview(&name),
            ShellCommand::Download { name, output } => {
                self.run_download(&name, output.as_deref()).await
            }
            ShellCommand::Delete { name } => self.run_delete(&name),
            ShellCommand::Confirm { name } => self.run_confirm(&name).await,
            ShellCommand::Cancel { name } => Ok(self.run_cancel(&name)),
            ShellCommand::Stats => self.run_stats(),
            ShellCommand::Exit => return Ok(Flow::Exit),
        };

        // An expired session leaves nothing to show.
        if self.session.state() == SessionState::LoggedOut {
            self.listing.clear();
        }
        result.map(Flow::Continue)
    }

    /// Read commands from stdin until `exit` or end of input.
    pub async fn run(&mut self) -> Result<(), CliError> {
        let interactive = io::stdin().is_terminal();
        if interactive {
            println!("FileShare Hub. Type `help` for commands.");
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            if interactive {
                print!("{PROMPT}");
                io::stdout().flush()?;
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };

            match self.execute_line(&line).await {
                Ok(Flow::Continue(output)) => {
                    for line in output {
                        println!("{line}");
                    }
                }
                Ok(Flow::Exit) => break,
                Err(error) => eprintln!("Error: {error}"),
            }
        }

        self.session.sign_out().await;
        Ok(())
    }

    async fn execute_line(&mut self, line: &str) -> Result<Flow, CliError> {
        let words = split_line(line)?;
        if words.is_empty() {
            return Ok(Flow::Continue(Vec::new()));
        }

        match ShellLine::try_parse_from(words) {
            Ok(parsed) => self.execute(parsed.command).await,
            Err(error) => Ok(Flow::Continue(vec![error
                .render()
                .to_string()
                .trim_end()
                .to_string()])),
        }
    }
}
