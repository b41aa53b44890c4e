use thiserror::Error;

/// Errors raised while building engine components.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date predicate was given a reference bound that does not match the
    /// fixed `%Y-%m-%d %H:%M:%S%.3f` literal form.
    #[error("invalid date bound {value:?} (expected the %Y-%m-%d %H:%M:%S%.3f form): {source}")]
    BadDateBound {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
