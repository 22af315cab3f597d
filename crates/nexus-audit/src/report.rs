use std::fs;
use std::path::Path;

use chrono::Utc;
use serde_json::json;

use crate::error::{Error, Result};
use crate::scan::ScanReport;

/// Write the scan as pretty-printed JSON. Only completed scans are
/// written; a terminated scan's partial findings stay in the logs.
pub fn write_json(report: &ScanReport, path: &Path) -> Result<()> {
    let doc = json!({
        "repository": report.repository,
        "local_root": report.local_root.display().to_string(),
        "remote_base": report.remote_base,
        "generated_at": Utc::now().to_rfc3339(),
        "dirs_checked": report.dirs_checked,
        "files_checked": report.files_checked,
        "lost_directories": report.lost_dirs,
        "lost_files": report.lost_files,
    });
    let body = serde_json::to_string_pretty(&doc)
        .map_err(|e| Error::report(format!("json encode error: {e}")))?;
    fs::write(path, body)
        .map_err(|e| Error::report(format!("failed to write {}: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn report_round_trips_through_json() {
        let report = ScanReport {
            repository: "ga".into(),
            local_root: PathBuf::from("/srv/repo"),
            remote_base: "https://mirror.example.com".into(),
            lost_dirs: vec!["x".into()],
            lost_files: vec!["b/c.jar".into()],
            dirs_checked: 3,
            files_checked: 9,
        };

        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("audit.json");
        write_json(&report, &path).expect("write report");

        let body = std::fs::read_to_string(&path).expect("read report");
        let doc: serde_json::Value = serde_json::from_str(&body).expect("parse report");
        assert_eq!(doc["repository"], "ga");
        assert_eq!(doc["local_root"], "/srv/repo");
        assert_eq!(doc["dirs_checked"], 3);
        assert_eq!(doc["files_checked"], 9);
        assert_eq!(doc["lost_directories"][0], "x");
        assert_eq!(doc["lost_files"][0], "b/c.jar");

        let stamp = doc["generated_at"].as_str().expect("timestamp");
        chrono::DateTime::parse_from_rfc3339(stamp).expect("rfc3339 timestamp");
    }

    #[test]
    fn write_into_missing_directory_is_a_report_error() {
        let report = ScanReport {
            repository: "ga".into(),
            local_root: PathBuf::from("/srv/repo"),
            remote_base: "https://mirror.example.com".into(),
            lost_dirs: Vec::new(),
            lost_files: Vec::new(),
            dirs_checked: 0,
            files_checked: 0,
        };

        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("no-such-dir").join("audit.json");
        let err = write_json(&report, &path).expect_err("missing parent");
        assert_eq!(err.kind(), crate::error::ErrorKind::Report);
    }
}
