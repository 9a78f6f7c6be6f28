use {
    thiserror::Error,
    super::method::Method,
};

/// Reasons a route is refused at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid path pattern {0:?}: must start with '/'")]
    InvalidPattern(String),

    #[error("path pattern {0:?} has a capture segment without a name")]
    EmptyVariableName(String),

    #[error("path pattern {pattern:?} captures {name:?} more than once")]
    DuplicateVariable { pattern: String, name: String },

    #[error("method {0} can't be routed")]
    UnsupportedMethod(Method),
}
