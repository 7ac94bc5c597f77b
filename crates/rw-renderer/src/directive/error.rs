//! Errors raised by directive and role invocations.

/// Error produced by a single directive or role invocation.
///
/// The tree builder absorbs these per invocation: the failure is recorded as
/// a [`Diagnostic`](crate::Diagnostic) and the invocation's raw source is kept
/// in a [`Problematic`](crate::NodeKind::Problematic) node.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// Option not declared in the directive's option spec.
    #[error("unknown option `{option}` for directive `{directive}`")]
    UnknownOption {
        /// Directive name.
        directive: String,
        /// Offending option name.
        option: String,
    },
    /// Option value rejected by its declared kind.
    #[error("invalid value for option `{option}`: {message}")]
    InvalidOptionValue {
        /// Option name.
        option: String,
        /// Why the value was rejected.
        message: String,
    },
    /// Wrong number of positional arguments.
    #[error("directive `{directive}` takes {expected} argument(s), {found} supplied")]
    ArgumentCount {
        /// Directive name.
        directive: String,
        /// Accepted argument count (e.g., "1" or "1-2").
        expected: String,
        /// Supplied argument count.
        found: usize,
    },
    /// Directive requires a body but none was given.
    #[error("content block expected for the `{directive}` directive; none found")]
    EmptyContent {
        /// Directive name.
        directive: String,
    },
    /// Directive takes no body but one was given.
    #[error("no content permitted for the `{directive}` directive")]
    UnexpectedContent {
        /// Directive name.
        directive: String,
    },
    /// Nested parsing exceeded the configured depth.
    #[error("maximum nesting depth ({max}) exceeded")]
    NestingTooDeep {
        /// Configured maximum depth.
        max: usize,
    },
    /// Handler-specific failure.
    #[error(transparent)]
    Handler(Box<dyn std::error::Error + Send + Sync>),
}

impl DirectiveError {
    /// Wrap a handler-specific error.
    pub fn handler(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Handler(Box::new(error))
    }
}
