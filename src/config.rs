use std::path::PathBuf;

/// Read-only process configuration, built once from startup arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the server listens on.
    pub port: u16,
    /// Shared secret that must match the `code` query parameter.
    pub verification_code: String,
    /// Directory served for all non-feed paths.
    pub webroot: PathBuf,
}
