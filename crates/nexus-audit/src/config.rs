use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DEFAULT_REPOSITORY: &str = "ga";
pub const DEFAULT_REMOTE_BASE: &str = "https://maven.repository.redhat.com";
pub const DEFAULT_THREADS: usize = 20;

/// Request verb used for the remote existence probe. HEAD is the cheap
/// default; GET exists for mirrors that mishandle HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Head,
    Get,
}

impl Default for ProbeMethod {
    fn default() -> Self {
        ProbeMethod::Head
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root of the local exploded repository tree.
    pub local_root: PathBuf,
    /// Release name inserted into every remote URL.
    pub repository: String,
    /// Scheme and host (and optional path prefix) of the remote mirror.
    pub remote_base: String,
    /// Restrict the audit to *.jar files.
    pub jars_only: bool,
    pub probe: ProbeMethod,
    /// Verifier thread count; 0 means one per CPU.
    pub threads: usize,
    // Parsed and carried, but remote checksum comparison is not implemented.
    pub verify_md5: bool,
    pub verify_sha1: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            local_root: PathBuf::new(),
            repository: DEFAULT_REPOSITORY.into(),
            remote_base: DEFAULT_REMOTE_BASE.into(),
            jars_only: false,
            probe: ProbeMethod::Head,
            threads: DEFAULT_THREADS,
            verify_md5: false,
            verify_sha1: false,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.remote_base.trim().is_empty() {
            return Err(Error::config("remote base URL is empty"));
        }
        if self.repository.trim_matches('/').is_empty() {
            return Err(Error::config("repository name is empty"));
        }
        if !self.local_root.is_dir() {
            return Err(Error::config(format!(
                "local repository root {} is not a directory",
                self.local_root.display()
            )));
        }
        Ok(())
    }

    // Single point of URL composition: base/<repository>/<relative path>,
    // with each joint collapsed to one slash. Paths are used verbatim,
    // matching the remote repository's on-disk layout.
    pub fn artifact_url(&self, rel_path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.remote_base.trim_end_matches('/'),
            self.repository.trim_matches('/'),
            rel_path
        )
    }

    pub fn worker_count(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get().max(1)
        } else {
            self.threads
        }
    }
}
