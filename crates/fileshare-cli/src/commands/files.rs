use std::path::{Path, PathBuf};

use fileshare_core::auth::AuthBackend;
use fileshare_core::format::{format_size, mime_type_for_name, OCTET_STREAM};
use fileshare_core::listing::compute_stats;
use fileshare_core::storage::StorageBackend;
use fileshare_core::{FileRecord, SessionState};

use crate::commands::common::{
    file_to_list_item, format_file_lines, format_preview_lines, format_stats_lines,
    format_upload_details, FileListItem,
};
use crate::error::CliError;
use crate::shell::Shell;

const REFRESH_HINT: &str = "Run `refresh` to update the listing.";

impl<A: AuthBackend, S: StorageBackend> Shell<A, S> {
    pub(crate) async fn run_upload(
        &mut self,
        path: &Path,
        name: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<Vec<String>, CliError> {
        let file_name = match name {
            Some(name) => name.to_string(),
            None => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    fileshare_core::Error::InvalidInput(format!(
                        "'{}' does not name a file; pass --name",
                        path.display()
                    ))
                })?,
        };
        let content = tokio::fs::read(path).await?;

        let guessed = mime_type_for_name(&file_name);
        let shown_type = content_type
            .map(ToString::to_string)
            .or_else(|| (guessed != OCTET_STREAM).then_some(guessed));
        let mut output = format_upload_details(
            &file_name,
            u64::try_from(content.len()).unwrap_or(u64::MAX),
            shown_type.as_deref(),
        );

        let remote_path = self
            .dispatcher
            .upload(&mut self.session, &file_name, &content, content_type)
            .await?;
        output.push(format!("Uploaded to {remote_path}. {REFRESH_HINT}"));
        Ok(output)
    }

    pub(crate) async fn run_refresh(&mut self, as_json: bool) -> Result<Vec<String>, CliError> {
        self.listing = self.dispatcher.refresh(&mut self.session).await?;
        self.render_listing(as_json)
    }

    /// Print the last fetched listing without contacting the backend.
    pub(crate) fn run_ls(&self, as_json: bool) -> Result<Vec<String>, CliError> {
        self.require_session()?;
        self.render_listing(as_json)
    }

    pub(crate) fn run_preview(&self, name: &str) -> Result<Vec<String>, CliError> {
        self.require_session()?;
        let record = self.listed(name)?;
        Ok(format_preview_lines(
            &record.name,
            &self.dispatcher.preview(record),
        ))
    }

    pub(crate) async fn run_download(
        &mut self,
        name: &str,
        output: Option<&Path>,
    ) -> Result<Vec<String>, CliError> {
        let object = self.dispatcher.download(&mut self.session, name).await?;
        let target = output.map_or_else(|| PathBuf::from(name.trim()), Path::to_path_buf);
        tokio::fs::write(&target, &object.bytes).await?;

        let size = u64::try_from(object.bytes.len()).unwrap_or(u64::MAX);
        Ok(vec![format!(
            "Saved {} to {} ({})",
            name.trim(),
            target.display(),
            format_size(size)
        )])
    }

    pub(crate) fn run_delete(&mut self, name: &str) -> Result<Vec<String>, CliError> {
        self.require_session()?;
        let name = self.listed(name)?.name.clone();
        self.dispatcher.request_delete(&mut self.session, &name)?;
        Ok(vec![format!(
            "Delete {name}? Run `confirm {name}` to delete it or `cancel {name}` to keep it."
        )])
    }

    pub(crate) async fn run_confirm(&mut self, name: &str) -> Result<Vec<String>, CliError> {
        let name = name.trim();
        self.dispatcher.confirm_delete(&mut self.session, name).await?;
        Ok(vec![format!("Deleted {name}. {REFRESH_HINT}")])
    }

    pub(crate) fn run_cancel(&mut self, name: &str) -> Vec<String> {
        let name = name.trim();
        self.dispatcher.cancel_delete(&mut self.session, name);
        vec![format!("Kept {name}.")]
    }

    pub(crate) fn run_stats(&self) -> Result<Vec<String>, CliError> {
        self.require_session()?;
        Ok(format_stats_lines(&compute_stats(&self.listing)))
    }

    fn render_listing(&self, as_json: bool) -> Result<Vec<String>, CliError> {
        let pending = self.session.confirmations();
        if as_json {
            let items = self
                .listing
                .iter()
                .map(|record| file_to_list_item(record, self.dispatcher.public_url(record), pending))
                .collect::<Vec<FileListItem>>();
            Ok(vec![serde_json::to_string_pretty(&items)?])
        } else {
            Ok(format_file_lines(&self.listing, pending))
        }
    }

    fn listed(&self, name: &str) -> Result<&FileRecord, CliError> {
        let name = name.trim();
        self.listing
            .iter()
            .find(|record| record.name == name)
            .ok_or_else(|| CliError::FileNotListed(name.to_string()))
    }

    fn require_session(&self) -> Result<(), CliError> {
        if self.session.state() == SessionState::LoggedIn {
            Ok(())
        } else {
            Err(fileshare_core::Error::NotSignedIn.into())
        }
    }
}
