use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use kidsafe_core::PrecomputedAnalyses;
use kidsafe_logging::kidsafe_info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrecomputedError {
    #[error("precomputed analyses not found at {0:?}")]
    NotFound(PathBuf),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid precomputed analyses in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("precomputed load did not finish: {0}")]
    Interrupted(String),
}

/// Reads the `{brand: AnalysisResult}` JSON file produced offline.
pub fn load_precomputed(path: &Path) -> Result<PrecomputedAnalyses, PrecomputedError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(PrecomputedError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(PrecomputedError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let analyses: PrecomputedAnalyses =
        serde_json::from_str(&content).map_err(|source| PrecomputedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    kidsafe_info!("Read {} precomputed analyses from {:?}", analyses.len(), path);
    Ok(analyses)
}
