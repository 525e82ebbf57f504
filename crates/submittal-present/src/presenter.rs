//! Preview and download of rendered packets.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::{Builder, TempPath};
use tokio::task::JoinHandle;

use crate::TRACING_TARGET;
use crate::config::PresenterConfig;
use crate::error::{PresentationError, Result};
use crate::viewer::{SystemViewer, Viewer};

/// How a preview ended up being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewMode {
    /// Shown in a new viewing context.
    Opened,
    /// Opening failed; shown in the current viewing context instead.
    Navigated,
}

/// A preview in progress.
///
/// The backing file is removed once the release delay has passed.
#[derive(Debug)]
pub struct Preview {
    path: PathBuf,
    mode: PreviewMode,
    release: JoinHandle<()>,
}

impl Preview {
    /// Location of the preview file while it exists.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    /// Waits until the preview file has been released.
    pub async fn released(self) {
        if let Err(error) = self.release.await {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Preview release task did not complete"
            );
        }
    }
}

/// Presents rendered packets to the operator.
#[derive(Clone)]
pub struct ArtifactPresenter {
    viewer: Arc<dyn Viewer>,
    config: PresenterConfig,
}

impl std::fmt::Debug for ArtifactPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactPresenter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ArtifactPresenter {
    /// Creates a presenter that uses the platform viewer.
    pub fn new(config: PresenterConfig) -> Self {
        Self::with_viewer(config, SystemViewer)
    }

    /// Creates a presenter with a custom viewer.
    pub fn with_viewer(config: PresenterConfig, viewer: impl Viewer + 'static) -> Self {
        Self {
            viewer: Arc::new(viewer),
            config,
        }
    }

    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    /// Shows the packet, preferring a new viewing context.
    ///
    /// Must be called within a tokio runtime; the preview file is released
    /// by a background task.
    pub async fn preview(&self, bytes: &[u8]) -> Result<Preview> {
        if bytes.is_empty() {
            return Err(PresentationError::EmptyArtifact);
        }

        let path = materialize_preview(bytes).map_err(PresentationError::Materialize)?;

        // Dropping the temp path on failure removes the file.
        let mode = self.show(path.to_path_buf()).await?;

        tracing::info!(
            target: TRACING_TARGET,
            path = %path.display(),
            mode = ?mode,
            size = bytes.len(),
            "Packet preview shown"
        );

        let location = path.to_path_buf();
        let delay = self.config.release_delay();
        let release = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let shown = path.to_path_buf();
            match path.close() {
                Ok(()) => tracing::debug!(
                    target: TRACING_TARGET,
                    path = %shown.display(),
                    "Released preview file"
                ),
                Err(error) => tracing::warn!(
                    target: TRACING_TARGET,
                    path = %shown.display(),
                    error = %error,
                    "Failed to release preview file"
                ),
            }
        });

        Ok(Preview {
            path: location,
            mode,
            release,
        })
    }

    /// Runs the viewer off the async workers, since openers may block until
    /// the operator closes them.
    async fn show(&self, path: PathBuf) -> Result<PreviewMode> {
        let viewer = Arc::clone(&self.viewer);
        tokio::task::spawn_blocking(move || match viewer.open(&path) {
            Ok(()) => Ok(PreviewMode::Opened),
            Err(open_error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %open_error,
                    "Could not open a new viewer, using the current one"
                );
                viewer.navigate(&path).map(|()| PreviewMode::Navigated)
            }
        })
        .await
        .map_err(|join_error| PresentationError::Open(std::io::Error::other(join_error)))?
        .map_err(PresentationError::Open)
    }

    /// Saves the packet into the download directory.
    ///
    /// `.pdf` is appended when the name does not already end with it, in any
    /// letter case. Returns the saved path.
    pub fn download(&self, bytes: &[u8], file_name: &str) -> Result<PathBuf> {
        if bytes.is_empty() {
            return Err(PresentationError::EmptyArtifact);
        }

        let file_name = pdf_file_name(file_name)?;
        let target = self.config.download_dir.join(&file_name);

        let mut file = Builder::new()
            .prefix(".submittal-")
            .suffix(".part")
            .tempfile_in(&self.config.download_dir)
            .map_err(PresentationError::Materialize)?;
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(PresentationError::Materialize)?;

        file.persist(&target)
            .map_err(|e| PresentationError::Save(e.error))?;

        tracing::info!(
            target: TRACING_TARGET,
            path = %target.display(),
            size = bytes.len(),
            "Packet saved"
        );

        Ok(target)
    }
}

fn materialize_preview(bytes: &[u8]) -> std::io::Result<TempPath> {
    let mut file = Builder::new()
        .prefix("submittal-preview-")
        .suffix(".pdf")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file.into_temp_path())
}

/// Validates a bare file name and gives it a `.pdf` suffix.
fn pdf_file_name(file_name: &str) -> Result<String> {
    let name = file_name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(PresentationError::InvalidFileName(file_name.to_owned()));
    }

    if name.to_ascii_lowercase().ends_with(".pdf") {
        Ok(name.to_owned())
    } else {
        Ok(format!("{name}.pdf"))
    }
}
