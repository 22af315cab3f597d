use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use nexus_audit::config::{self, ProbeMethod, ScanConfig};
use nexus_audit::report;
use nexus_audit::scan::{self, ScanReport};

/// Audit an exploded local repository tree against its remote HTTP mirror:
/// every local file and directory must exist at the corresponding URL.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Local repository root to audit
    #[arg(long)]
    repository: PathBuf,
    /// Release name inserted into every remote URL
    #[arg(long, default_value = config::DEFAULT_REPOSITORY)]
    repository_name: String,
    /// Base URL of the remote mirror
    #[arg(long, default_value = config::DEFAULT_REMOTE_BASE)]
    remote_root: String,
    /// Audit only *.jar files
    #[arg(long)]
    jars_only: bool,
    /// Probe with GET instead of HEAD (for mirrors that mishandle HEAD)
    #[arg(long)]
    get: bool,
    /// Number of verifier threads (0 = one per CPU)
    #[arg(long, default_value_t = config::DEFAULT_THREADS)]
    threads: usize,
    /// Compare MD5 checksums against the mirror (not implemented yet)
    #[arg(long)]
    md5: bool,
    /// Compare SHA-1 checksums against the mirror (not implemented yet)
    #[arg(long)]
    sha1: bool,
    /// Write a JSON report of the completed scan to this path
    #[arg(long)]
    json: Option<PathBuf>,
    /// Log every verified artifact, not just the lost ones
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let cfg = scan_config(&args);
    if cfg.verify_md5 || cfg.verify_sha1 {
        warn!("remote checksum verification is not implemented; digests are only logged at trace level");
    }

    let mut report = ScanReport::new(&cfg);
    info!(
        root = %cfg.local_root.display(),
        remote = %cfg.remote_base,
        repository = %cfg.repository,
        workers = cfg.worker_count(),
        "scan starting"
    );

    if let Err(e) = scan::run(&cfg, &mut report) {
        error!(error = %e, "scan terminated");
        if report.lost_total() > 0 {
            warn!(
                lost_files = report.lost_files.len(),
                lost_dirs = report.lost_dirs.len(),
                "partial findings recorded before termination"
            );
        }
        process::exit(1);
    }

    info!(
        files = report.files_checked,
        dirs = report.dirs_checked,
        lost = report.lost_total(),
        "scan complete"
    );

    if let Some(path) = args.json.as_deref() {
        if let Err(e) = report::write_json(&report, path) {
            error!(error = %e, "failed to write JSON report");
            process::exit(1);
        }
        info!(path = %path.display(), "wrote JSON report");
    }
}

fn scan_config(args: &Args) -> ScanConfig {
    ScanConfig {
        local_root: args.repository.clone(),
        repository: args.repository_name.clone(),
        remote_base: args.remote_root.clone(),
        jars_only: args.jars_only,
        probe: if args.get {
            ProbeMethod::Get
        } else {
            ProbeMethod::Head
        },
        threads: args.threads,
        verify_md5: args.md5,
        verify_sha1: args.sha1,
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "naudit=debug,nexus_audit=debug"
    } else {
        "naudit=info,nexus_audit=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
