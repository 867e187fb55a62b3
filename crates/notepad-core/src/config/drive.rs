//! Drive (uploaded file) storage configuration.

use serde::{Deserialize, Serialize};

/// Where uploaded blobs live and how large they may be.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Directory that receives uploaded blobs.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload(),
        }
    }
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_upload() -> u64 {
    100 * 1024 * 1024
}
