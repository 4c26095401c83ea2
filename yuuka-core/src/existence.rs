use std::path::{Path, PathBuf};

use log::debug;
use tokio::fs::try_exists;

/// Checks whether `file_name` is already present in `output_dir` or in any of `check_dirs`.
///
/// `output_dir` is probed first, then `check_dirs` in order, stopping at the first match. Probe
/// failures (permission denied, broken links, etc) count as "not found" for that path.
pub async fn exists(file_name: &str, output_dir: &Path, check_dirs: &[PathBuf]) -> bool {
    for dir in std::iter::once(output_dir).chain(check_dirs.iter().map(PathBuf::as_path)) {
        let candidate = dir.join(file_name);

        match try_exists(&candidate).await {
            Ok(true) => {
                debug!("File {} found.", candidate.display());
                return true;
            }
            Ok(false) => {}
            Err(error) => {
                debug!("Failed to probe {}: {}", candidate.display(), error);
            }
        }
    }

    false
}
