use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("failed to fetch {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{path} returned {status}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("zip '{zip}' cannot be used in a data path")]
    UnsafeZip { zip: String },

    #[error("invalid value '{value}' for {key}")]
    Config { key: &'static str, value: String },
}
