use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, select};

use crate::config::{ProbeMethod, ScanConfig};
use crate::error::{Error, Result};
use crate::walker::LocalArtifact;

/// Outcome of one remote existence probe.
#[derive(Debug)]
pub struct Verification {
    pub path: String,
    pub url: String,
    pub is_dir: bool,
    /// `Ok` carries the HTTP status the mirror answered with; `Err` is a
    /// transport failure, which is not a negative answer about the artifact.
    pub status: std::result::Result<reqwest::StatusCode, reqwest::Error>,
}

/// HTTP client for one verifier worker.
pub fn client() -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .no_gzip()
        // Clears the blocking client's default 30s request timeout; probes
        // run without a deadline.
        .timeout(None)
        .build()
        .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))
}

/// Drain the artifact channel, emitting one verification per artifact.
/// Ends on input disconnect (walker done, channel drained) or when the
/// cancellation channel closes.
pub fn worker_loop(
    cfg: &ScanConfig,
    client: reqwest::blocking::Client,
    artifacts: Receiver<LocalArtifact>,
    results: Sender<Verification>,
    cancel: Receiver<()>,
) {
    loop {
        let artifact = select! {
            recv(artifacts) -> msg => match msg {
                Ok(a) => a,
                Err(_) => return,
            },
            recv(cancel) -> _ => return,
        };
        let verification = probe(cfg, &client, artifact);
        select! {
            send(results, verification) -> sent => {
                if sent.is_err() {
                    return;
                }
            }
            recv(cancel) -> _ => return,
        }
    }
}

// One attempt per artifact, no retries; the aggregator decides what a
// failure means.
fn probe(
    cfg: &ScanConfig,
    client: &reqwest::blocking::Client,
    artifact: LocalArtifact,
) -> Verification {
    let url = cfg.artifact_url(&artifact.path);
    let req = match cfg.probe {
        ProbeMethod::Head => client.head(&url),
        ProbeMethod::Get => client.get(&url),
    };
    let status = req.send().map(|res| res.status());
    Verification {
        path: artifact.path,
        url,
        is_dir: artifact.is_dir,
        status,
    }
}
