//! OAuth client credentials for the Google provider.
//!
//! Accepts the client secrets JSON downloaded from the Google Cloud console
//! (`{"installed": {...}}` or `{"web": {...}}`) as well as a flat
//! `{"client_id": ..., "client_secret": ...}` object.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Google OAuth client credentials (user-provided).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecretsFile {
    Installed { installed: Credentials },
    Web { web: Credentials },
    Flat(Credentials),
}

impl Credentials {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Google credentials not found at {}.\n\n\
                Download an OAuth client (Desktop app) JSON from\n\
                https://console.cloud.google.com/apis/credentials\n\
                and point GOOGLE_CREDENTIALS_FILE_PATH at it.",
                path.display()
            );
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse credentials from {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        let file: SecretsFile = serde_json::from_str(json)?;

        Ok(match file {
            SecretsFile::Installed { installed } => installed,
            SecretsFile::Web { web } => web,
            SecretsFile::Flat(creds) => creds,
        })
    }
}
