use std::io;

use fileshare_core::auth::AuthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] fileshare_core::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "Supabase is not configured. Set SUPABASE_URL and SUPABASE_KEY, or pass --supabase-url and --supabase-key."
    )]
    NotConfigured,
    #[error("'{0}' is not in the current listing. Run `refresh` first.")]
    FileNotListed(String),
    #[error("Unterminated quote in command line")]
    UnterminatedQuote,
}
