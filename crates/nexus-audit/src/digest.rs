use std::fs;
use std::io::Read;
use std::path::Path;

use md5::{Digest, Md5};
use sha1::Sha1;

use crate::error::{Error, Result};

/// Hex-encoded MD5 and SHA-1 of a file's content, the checksum pair
/// published alongside Maven artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDigests {
    pub md5: String,
    pub sha1: String,
}

pub fn digests_for_file(path: &Path) -> Result<ContentDigests> {
    let mut file = fs::File::open(path)
        .map_err(|e| Error::walk(format!("failed to open {}: {e}", path.display())))?;
    let mut md5 = Md5::new();
    let mut sha1 = Sha1::new();
    let mut buf = [0u8; 1024 * 256];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| Error::walk(format!("failed to read {}: {e}", path.display())))?;
        if n == 0 {
            break;
        }
        md5.update(&buf[..n]);
        sha1.update(&buf[..n]);
    }
    Ok(ContentDigests {
        md5: hex::encode(md5.finalize()),
        sha1: hex::encode(sha1.finalize()),
    })
}
