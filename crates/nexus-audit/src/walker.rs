use std::path::Path;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, select};
use tracing::trace;
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::digest;
use crate::error::{Error, Result};

/// One entry of the local repository tree, as handed to the verifier pool.
#[derive(Debug, Clone)]
pub struct LocalArtifact {
    /// Path relative to the repository root, components joined with `/`.
    pub path: String,
    /// Hex MD5 of the content; empty for directories.
    pub md5: String,
    /// Hex SHA-1 of the content; empty for directories.
    pub sha1: String,
    pub is_dir: bool,
}

/// Walk the local tree on a dedicated thread, emitting one artifact per
/// file or directory. The walk's terminal error comes back through the
/// join handle; a filesystem error aborts the walk at the first entry it
/// cannot read.
pub fn spawn(
    cfg: &ScanConfig,
    artifacts: Sender<LocalArtifact>,
    cancel: Receiver<()>,
) -> JoinHandle<Result<()>> {
    let root = cfg.local_root.clone();
    let jars_only = cfg.jars_only;
    std::thread::spawn(move || walk_tree(&root, jars_only, artifacts, cancel))
}

fn walk_tree(
    root: &Path,
    jars_only: bool,
    artifacts: Sender<LocalArtifact>,
    cancel: Receiver<()>,
) -> Result<()> {
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| Error::walk(format!("walkdir error: {e}")))?;
        let rel = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| Error::walk(format!("strip_prefix failed: {e}")))?;
        // The root itself maps to the repository URL, not to an artifact.
        if rel.as_os_str().is_empty() {
            continue;
        }
        let is_dir = entry.file_type().is_dir();
        if jars_only && (is_dir || !has_jar_extension(entry.path())) {
            continue;
        }

        let path = relative_slash_path(rel)?;
        let (md5, sha1) = if is_dir {
            (String::new(), String::new())
        } else {
            let d = digest::digests_for_file(entry.path())?;
            (d.md5, d.sha1)
        };
        let artifact = LocalArtifact { path, md5, sha1, is_dir };
        trace!(path = %artifact.path, md5 = %artifact.md5, sha1 = %artifact.sha1, "walked");

        // Receivers disappear only at scan teardown; treat both arms as
        // cancellation.
        select! {
            send(artifacts, artifact) -> sent => {
                if sent.is_err() {
                    return Err(Error::cancelled());
                }
            }
            recv(cancel) -> _ => return Err(Error::cancelled()),
        }
    }
    Ok(())
}

fn has_jar_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jar"))
        .unwrap_or(false)
}

// Strip-prefix output is platform separated; remote URLs always use `/`.
// A component that is not valid UTF-8 cannot be composed into a URL.
fn relative_slash_path(rel: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for c in rel.components() {
        let part = c
            .as_os_str()
            .to_str()
            .ok_or_else(|| Error::walk(format!("path is not valid UTF-8: {}", rel.display())))?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
