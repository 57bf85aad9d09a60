use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// libcurl settings applied to both legs of a transfer (`[http]` in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Hard wall-clock limit for one request, in seconds.
    pub timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/s ...
    pub low_speed_limit_bytes: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
    /// Follow 3xx redirects on the download leg. Uploads never follow them.
    pub follow_redirects: bool,
    /// Redirect hops allowed when following.
    pub max_redirections: u32,
    /// libcurl receive buffer size in bytes (None = library default).
    pub buffer_size: Option<usize>,
    /// Chunks buffered between the download and the upload leg.
    pub stream_chunks: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            follow_redirects: true,
            max_redirections: 10,
            buffer_size: None,
            stream_chunks: 16,
        }
    }
}

/// Global configuration loaded from `~/.config/s2s/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S2sConfig {
    /// Transfers from one batch allowed in flight at once.
    pub max_concurrent_transfers: usize,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for S2sConfig {
    fn default() -> Self {
        Self {
            max_concurrent_transfers: 4,
            http: HttpConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("s2s")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<S2sConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = S2sConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<S2sConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: S2sConfig = toml::from_str(&data)?;
    Ok(cfg)
}
