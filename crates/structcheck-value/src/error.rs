/// Errors that can occur when converting values out of the dynamic model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// The value has no JSON representation.
    #[error("value is not representable as JSON: {0}")]
    NotRepresentable(String),

    /// A number is NaN or infinite.
    #[error("non-finite number {0} cannot be represented as JSON")]
    NonFiniteNumber(f64),
}

pub type Result<T> = std::result::Result<T, ValueError>;
