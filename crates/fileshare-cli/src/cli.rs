use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "fileshare")]
#[command(about = "Upload, browse and share files in your FileShare Hub folder")]
#[command(version)]
pub struct Cli {
    /// Supabase project URL (overrides SUPABASE_URL)
    #[arg(long, value_name = "URL")]
    pub supabase_url: Option<String>,

    /// Supabase anon key (overrides SUPABASE_KEY)
    #[arg(long, value_name = "KEY")]
    pub supabase_key: Option<String>,

    /// Storage bucket (overrides FILESHARE_BUCKET)
    #[arg(long, value_name = "NAME")]
    pub bucket: Option<String>,
}

/// One line typed at the shell prompt.
#[derive(Parser, Debug)]
#[command(name = "fileshare", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ShellCommand {
    /// Create an account (confirm it by email, then log in)
    Signup { email: String, password: String },
    /// Sign in and load your files
    Login { email: String, password: String },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// Upload a local file
    Upload {
        /// Local file to upload
        path: PathBuf,
        /// Name to store the file under (defaults to the local file name)
        #[arg(long)]
        name: Option<String>,
        /// Content type (guessed from the name when omitted)
        #[arg(long, value_name = "TYPE")]
        content_type: Option<String>,
    },
    /// Fetch the current listing
    Refresh {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the last fetched listing
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how a file would be previewed
    Preview { name: String },
    /// Save a file locally
    Download {
        name: String,
        /// Output path (defaults to the file name in the current directory)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Ask to delete a file; run `confirm` or `cancel` next
    Delete { name: String },
    /// Delete a file after `delete`
    Confirm { name: String },
    /// Keep a file after `delete`
    Cancel { name: String },
    /// Summarize the last fetched listing
    Stats,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Split a shell line into words. Single or double quotes group words
/// containing spaces; a backslash escapes the next character.
pub fn split_line(line: &str) -> Result<Vec<String>, CliError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(open), ch) if ch == open => quote = None,
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (Some('\''), ch) => current.push(ch),
            (_, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            (None, ch) if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (_, ch) => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(CliError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
