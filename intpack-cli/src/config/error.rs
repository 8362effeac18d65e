/// Configuration error variants.
#[derive(Debug, thiserror::Error)]
pub enum IntpackConfigError {
    /// The decode allocation limit must allow at least one byte.
    #[error("The pack allocation limit must be nonzero")]
    ZeroAllocationLimit,

    /// The logging filter directives could not be parsed.
    #[error("Invalid logging directives '{0}': {1}")]
    InvalidLogDirectives(String, #[source] tracing_subscriber::filter::ParseError),
}
