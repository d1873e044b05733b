use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The module source is not valid ECMAScript. No partial output is produced.
    #[error("failed to parse {id}:{line}:{column}: {message}")]
    Parse {
        id: String,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("invalid {list} pattern `{pattern}`: {source}")]
    Pattern {
        list: &'static str,
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid plugin config: {0}")]
    Config(#[from] serde_json::Error),
}
