//! Revocable references to the file currently being edited.
//!
//! A [`SourceHandle`] is the desktop counterpart of an object URL: it names
//! the media by a `file://` URI, owns a scratch directory for derived files
//! (poster frames) and is registered in a [`SourceRegistry`] for as long as
//! it lives. Dropping the handle revokes the registration and deletes the
//! scratch directory, so replacing or clearing the source cannot leak it.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gstreamer as gst;
use parking_lot::RwLock;
use tempfile::TempDir;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::types::media::SelectedFile;

/// Tracks which source handles are live.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    live: Arc<RwLock<HashMap<Uuid, PathBuf>>>,
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a handle for `file`.
    pub fn acquire(&self, file: &SelectedFile) -> Result<SourceHandle> {
        let path = std::fs::canonicalize(&file.path)?;
        let uri = gst::glib::filename_to_uri(&path, None)?.to_string();
        let scratch = tempfile::Builder::new().prefix("cliptrim-").tempdir()?;
        let id = Uuid::new_v4();

        self.live.write().insert(id, path.clone());
        debug!(%id, uri = %uri, "source acquired");

        Ok(SourceHandle {
            id,
            path,
            uri,
            scratch,
            registry: self.clone(),
        })
    }

    /// Path behind a live handle, `None` once it has been revoked.
    pub fn resolve(&self, id: Uuid) -> Option<PathBuf> {
        self.live.read().get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.live.read().len()
    }

    fn revoke(&self, id: Uuid) {
        if self.live.write().remove(&id).is_some() {
            debug!(%id, "source revoked");
        }
    }
}

/// The single active media source. Not `Clone`: there is exactly one owner.
#[derive(Debug)]
pub struct SourceHandle {
    id: Uuid,
    path: PathBuf,
    uri: String,
    scratch: TempDir,
    registry: SourceRegistry,
}

impl SourceHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Canonical path of the media file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `file://` URI handed to the playback pipeline.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Directory for files derived from this source; removed on drop.
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }
}

impl Drop for SourceHandle {
    fn drop(&mut self) {
        self.registry.revoke(self.id);
    }
}
