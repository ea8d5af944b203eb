use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::core::errors::AppResult;

const READ_CHUNK: usize = 1024 * 1024;

pub fn checksum_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// SHA-256 of a file, streamed in 1 MiB chunks.
pub fn checksum_file(path: &Path) -> AppResult<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let read = file.read(&mut buf)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streamed_checksum_matches_in_memory_checksum() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let payload = vec![7u8; READ_CHUNK + 13];
        std::io::Write::write_all(&mut file, &payload).expect("write payload");

        let streamed = checksum_file(file.path()).expect("checksum file");
        assert_eq!(streamed, checksum_bytes(&payload));
        assert_eq!(streamed.len(), 64);
    }
}
