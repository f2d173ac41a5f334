/// Failures raised by the calculation and scoring engines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The engine was assembled without a usable rule set.
    #[error("engine misconfigured: {0}")]
    Configuration(String),
    #[error("invalid argument '{parameter}': {reason}")]
    InvalidArgument {
        parameter: &'static str,
        reason: String,
    },
    #[error("product type '{product_type}' has no calculation rule")]
    NotSupported { product_type: String },
    /// The inputs are valid but their result does not fit in a `Decimal`.
    #[error("arithmetic overflow while computing {operation}")]
    Overflow { operation: &'static str },
}

impl EngineError {
    pub(crate) fn invalid_argument(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            parameter,
            reason: reason.into(),
        }
    }
}
