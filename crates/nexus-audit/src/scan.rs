use std::path::PathBuf;

use crossbeam_channel::bounded;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::verify::{self, Verification};
use crate::walker::{self, LocalArtifact};

/// What the scan found. Filled in place through the `&mut` borrow held by
/// the aggregation loop; after a terminated scan the lists hold whatever
/// was classified before the abort.
#[derive(Debug)]
pub struct ScanReport {
    pub repository: String,
    pub local_root: PathBuf,
    pub remote_base: String,
    pub lost_dirs: Vec<String>,
    pub lost_files: Vec<String>,
    pub dirs_checked: usize,
    pub files_checked: usize,
}

impl ScanReport {
    pub fn new(cfg: &ScanConfig) -> Self {
        Self {
            repository: cfg.repository.clone(),
            local_root: cfg.local_root.clone(),
            remote_base: cfg.remote_base.clone(),
            lost_dirs: Vec::new(),
            lost_files: Vec::new(),
            dirs_checked: 0,
            files_checked: 0,
        }
    }

    pub fn lost_total(&self) -> usize {
        self.lost_dirs.len() + self.lost_files.len()
    }
}

// Directories may sit behind a redirect on the mirror; files must answer
// 200 exactly.
const ACCEPTABLE_DIR_STATUS: [StatusCode; 3] = [
    StatusCode::OK,
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::FOUND,
];

/// Walk the local tree and verify every artifact against the remote
/// mirror. One walker thread feeds N verifier threads; results are
/// classified into `report` on the calling thread.
pub fn run(cfg: &ScanConfig, report: &mut ScanReport) -> Result<()> {
    cfg.validate()?;
    let workers = cfg.worker_count();

    // Client construction failures surface before any thread spawns.
    let mut clients = Vec::with_capacity(workers);
    for _ in 0..workers {
        clients.push(verify::client()?);
    }

    let (artifact_tx, artifact_rx) = bounded::<LocalArtifact>(0);
    let (result_tx, result_rx) = bounded::<Verification>(0);
    let (cancel_tx, cancel_rx) = bounded::<()>(0);

    let walker_handle = walker::spawn(cfg, artifact_tx, cancel_rx.clone());

    let mut worker_handles = Vec::with_capacity(workers);
    for client in clients {
        let cfg = cfg.clone();
        let artifacts = artifact_rx.clone();
        let results = result_tx.clone();
        let cancel = cancel_rx.clone();
        worker_handles.push(std::thread::spawn(move || {
            verify::worker_loop(&cfg, client, artifacts, results, cancel)
        }));
    }
    drop(artifact_rx);
    drop(cancel_rx);

    // The closer holds the original results sender: the channel closes
    // only after a counted join of every worker, so the aggregation loop
    // ending means all network work is done. Worker panics surface here.
    let closer = std::thread::spawn(move || -> Result<()> {
        let mut panicked: Option<Error> = None;
        for handle in worker_handles {
            if let Err(panic) = handle.join() {
                if panicked.is_none() {
                    panicked = Some(Error::internal(format!("verifier panicked: {panic:?}")));
                }
            }
        }
        drop(result_tx);
        match panicked {
            Some(e) => Err(e),
            None => Ok(()),
        }
    });

    let mut scan_err: Option<Error> = None;
    for v in result_rx.iter() {
        match &v.status {
            Ok(code) => classify(report, &v.path, v.is_dir, *code),
            Err(e) => {
                // An unreachable endpoint says nothing about any artifact;
                // the first transport failure aborts the scan.
                scan_err = Some(Error::transport(format!("probe of {} failed: {e}", v.url)));
                break;
            }
        }
    }

    // Dropping the sole cancellation sender is the broadcast: every
    // blocked handoff in the walker and the workers unblocks through it.
    drop(cancel_tx);

    let walk_res = match walker_handle.join() {
        Ok(r) => r,
        Err(panic) => Err(Error::internal(format!("walker panicked: {panic:?}"))),
    };
    let closer_res = match closer.join() {
        Ok(r) => r,
        Err(panic) => Err(Error::internal(format!("closer panicked: {panic:?}"))),
    };

    if let Some(e) = scan_err {
        return Err(e);
    }
    if let Err(e) = walk_res {
        // A cancellation here is a teardown echo, not a scan failure.
        if e.kind() != ErrorKind::Cancelled {
            return Err(e);
        }
    }
    closer_res
}

fn classify(report: &mut ScanReport, path: &str, is_dir: bool, code: StatusCode) {
    if is_dir {
        report.dirs_checked += 1;
        if ACCEPTABLE_DIR_STATUS.contains(&code) {
            debug!(path, status = %code, "directory present");
        } else {
            warn!(path, status = %code, "directory lost");
            report.lost_dirs.push(path.to_string());
        }
    } else {
        report.files_checked += 1;
        if code == StatusCode::OK {
            debug!(path, status = %code, "file present");
        } else {
            warn!(path, status = %code, "file lost");
            report.lost_files.push(path.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ScanReport {
        ScanReport::new(&ScanConfig::default())
    }

    fn status(code: u16) -> StatusCode {
        StatusCode::from_u16(code).expect("status code")
    }

    #[test]
    fn file_is_lost_unless_the_mirror_answers_200() {
        let mut r = report();
        classify(&mut r, "a/ok.jar", false, status(200));
        classify(&mut r, "a/redirected.jar", false, status(302));
        classify(&mut r, "a/missing.jar", false, status(404));
        classify(&mut r, "a/broken.jar", false, status(500));

        assert_eq!(r.files_checked, 4);
        assert_eq!(
            r.lost_files,
            ["a/redirected.jar", "a/missing.jar", "a/broken.jar"]
        );
        assert!(r.lost_dirs.is_empty());
    }

    #[test]
    fn directory_tolerates_redirects() {
        let mut r = report();
        classify(&mut r, "x", true, status(200));
        classify(&mut r, "y", true, status(301));
        classify(&mut r, "z", true, status(302));
        classify(&mut r, "gone", true, status(404));
        classify(&mut r, "forbidden", true, status(403));

        assert_eq!(r.dirs_checked, 5);
        assert_eq!(r.lost_dirs, ["gone", "forbidden"]);
        assert!(r.lost_files.is_empty());
    }

    #[test]
    fn lost_entries_are_recorded_exactly_once() {
        let mut r = report();
        classify(&mut r, "gone", true, status(404));
        assert_eq!(r.lost_dirs, ["gone"]);

        let mut r = report();
        classify(&mut r, "gone.jar", false, status(410));
        assert_eq!(r.lost_files, ["gone.jar"]);
    }

    #[test]
    fn lost_total_sums_both_lists() {
        let mut r = report();
        classify(&mut r, "gone", true, status(404));
        classify(&mut r, "gone.jar", false, status(404));
        assert_eq!(r.lost_total(), 2);
    }
}
