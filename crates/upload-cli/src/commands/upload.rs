//! Upload command - submit a file through the form

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use upload_client::UploadClient;
use upload_core::{HandlerSettings, SelectedFile, UploadFormHandler};

use crate::output::{ConsoleNavigator, ConsoleView, OutputContext};
use crate::storage::FileStore;

/// Submit the form once with the file at `file_path` (or none)
///
/// Returns whether the submission ended in a redirect. Failures have
/// already been printed as the form's status text.
pub async fn upload(
    client: UploadClient,
    store: FileStore,
    settings: HandlerSettings,
    file_path: Option<&Path>,
    ctx: &OutputContext,
) -> Result<bool> {
    let file = match file_path {
        Some(path) => Some(read_selected_file(path).await?),
        None => None,
    };

    let view = Arc::new(ConsoleView::new(file, *ctx));
    let navigator = Arc::new(ConsoleNavigator::new(client.base_url().clone(), *ctx));
    let handler =
        UploadFormHandler::new(view, Arc::new(store), navigator, Arc::new(client))
            .with_settings(settings);

    Ok(handler.submit().await.is_ok())
}

/// Load a file from disk the way a file input would hand it over
async fn read_selected_file(path: &Path) -> Result<SelectedFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))?;

    Ok(SelectedFile::new(name, data).with_content_type("application/octet-stream"))
}
