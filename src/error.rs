use std::error::Error;
use std::fmt;

/// Represents errors that can occur when registering a route.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertError {
    /// A path template declares the same `:name` parameter more than once.
    DuplicateParam {
        /// The offending route path.
        route: String,
        /// The parameter name that is repeated.
        name: String,
    },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateParam { route, name } => {
                write!(f, "route '{route}' declares parameter ':{name}' more than once")
            }
        }
    }
}

impl Error for InsertError {}

/// Represents errors that can occur while dispatching a request.
///
/// Either way, no handler has been invoked: the embedder still owns the
/// response for the failed request.
#[non_exhaustive]
#[derive(Debug)]
pub enum DispatchError {
    /// The request body did not fully arrive within the configured bound.
    BodyTimeout,
    /// The request body stream failed before its end.
    Body(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BodyTimeout => write!(f, "timed out waiting for the request body"),
            Self::Body(err) => write!(f, "failed to read the request body: {err}"),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BodyTimeout => None,
            Self::Body(err) => Some(err.as_ref()),
        }
    }
}
