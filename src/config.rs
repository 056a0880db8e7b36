use crate::error::LookupError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// How ballot rows are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The whole dataset is loaded at startup and searched in memory.
    Preloaded,
    /// Only the zip lookup table is loaded; ballot rows are fetched per zip.
    Lazy,
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preloaded" => Ok(Mode::Preloaded),
            "lazy" => Ok(Mode::Lazy),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory or `http(s)://` base the data paths are relative to.
    pub data_root: String,
    pub mode: Mode,
    pub index_path: String,
    pub dataset_path: String,
    /// Per-zip ballot file, `{zip}` is substituted.
    pub zip_path: String,
    /// Per-zip visualization page, `{zip}` is substituted.
    pub map_path: String,
    pub output_path: PathBuf,
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_root: ".".to_string(),
            mode: Mode::Lazy,
            index_path: "zip_lookup.csv".to_string(),
            dataset_path: "data.csv".to_string(),
            zip_path: "data/{zip}.csv".to_string(),
            map_path: "maps/{zip}.html".to_string(),
            output_path: PathBuf::from("ballot.html"),
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, LookupError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LookupError> {
        let defaults = Config::default();
        let get = |key: &str, default: String| lookup(key).unwrap_or(default);

        let mode = match lookup("BALLOT_MODE") {
            Some(value) => value.parse().map_err(|_| LookupError::Config {
                key: "BALLOT_MODE",
                value,
            })?,
            None => defaults.mode,
        };

        let fetch_timeout = match lookup("BALLOT_FETCH_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| LookupError::Config {
                    key: "BALLOT_FETCH_TIMEOUT_SECS",
                    value,
                })?,
            None => defaults.fetch_timeout,
        };

        Ok(Self {
            data_root: get("BALLOT_DATA_ROOT", defaults.data_root),
            mode,
            index_path: get("BALLOT_INDEX_PATH", defaults.index_path),
            dataset_path: get("BALLOT_DATASET_PATH", defaults.dataset_path),
            zip_path: get("BALLOT_ZIP_PATH", defaults.zip_path),
            map_path: get("BALLOT_MAP_PATH", defaults.map_path),
            output_path: lookup("BALLOT_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            fetch_timeout,
        })
    }

    pub fn is_remote(&self) -> bool {
        self.data_root.starts_with("http://") || self.data_root.starts_with("https://")
    }
}

/// Fills `{zip}` in a path template. Zip text that could leave the
/// template's directory, or change the meaning of a URL, is refused.
pub fn zip_path(template: &str, zip: &str) -> Result<String, LookupError> {
    if zip.is_empty() || zip.contains("..") || zip.contains(['/', '\\', '?', '#', '%']) {
        return Err(LookupError::UnsafeZip { zip: zip.to_string() });
    }
    Ok(template.replace("{zip}", zip))
}
