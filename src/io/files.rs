use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Artifact directory with `txt/` and `pdf/` subdirectories
///
/// Files are named `<username>_<timestamp>.<ext>` so one user's runs
/// sort chronologically.
pub struct ArtifactDir {
    base: PathBuf,
}

impl ArtifactDir {
    /// Creates the directory layout under the given base path
    pub fn new(base: impl Into<PathBuf>) -> io::Result<Self> {
        let base = base.into();
        fs::create_dir_all(base.join("txt"))?;
        fs::create_dir_all(base.join("pdf"))?;
        Ok(Self { base })
    }

    /// Writes the transcript and document, returning their paths
    pub fn write_artifacts(
        &self,
        username: &str,
        timestamp: DateTime<Utc>,
        transcript: &str,
        document: &[u8],
    ) -> io::Result<(PathBuf, PathBuf)> {
        let stamp = timestamp.format("%Y%m%d_%H%M%S");
        let txt_path = self.base.join("txt").join(format!("{username}_{stamp}.txt"));
        let pdf_path = self.base.join("pdf").join(format!("{username}_{stamp}.pdf"));
        fs::write(&txt_path, transcript)?;
        fs::write(&pdf_path, document)?;
        Ok((txt_path, pdf_path))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_layout_and_naming() {
        let dir = TempDir::new().unwrap();
        let artifacts = ArtifactDir::new(dir.path().join("generated")).unwrap();

        let timestamp: DateTime<Utc> = "2024-05-01T10:30:00Z".parse().unwrap();
        let (txt, pdf) = artifacts
            .write_artifacts("alice", timestamp, "transcript", b"%PDF-1.4")
            .unwrap();

        assert!(txt.ends_with("txt/alice_20240501_103000.txt"));
        assert!(pdf.ends_with("pdf/alice_20240501_103000.pdf"));
        assert_eq!(fs::read_to_string(txt).unwrap(), "transcript");
        assert_eq!(fs::read(pdf).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_new_is_idempotent() {
        let dir = TempDir::new().unwrap();
        ArtifactDir::new(dir.path()).unwrap();
        ArtifactDir::new(dir.path()).unwrap();
    }
}
