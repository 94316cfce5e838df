/// Options recognized by [`validate`](crate::api::validate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Run every node's coercion before validating it.
    pub coerce: bool,
}

impl ValidateOptions {
    /// Options with coercion enabled.
    pub fn coercing() -> Self {
        Self { coerce: true }
    }
}

/// Controls registry validation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, registry validation coerces values and returns the coerced output.
    pub coerce: bool,
    /// When true, `type` schemas are closed into `object` schemas at registration.
    pub strict_mode: bool,
    /// When true, names without a schema return `SchemaError::NoSchema`.
    pub fail_on_missing_schema: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            coerce: true,
            strict_mode: false,
            fail_on_missing_schema: false,
        }
    }
}
