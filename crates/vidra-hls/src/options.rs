#![forbid(unsafe_code)]

use derivative::Derivative;
use derive_setters::Setters;

/// Configuration for the resource-loader interceptor.
#[derive(Clone, Debug, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
pub struct InterceptorOptions {
    /// Private scheme token that forces requests through the interceptor.
    #[derivative(Default(value = "\"vidra\".to_string()"))]
    pub scheme: String,
    /// Real transport scheme the private token stands in for.
    #[derivative(Default(value = "\"https\".to_string()"))]
    pub transport_scheme: String,
    /// File extension that marks a request as an encryption-key resource.
    #[derivative(Default(value = "\"key\".to_string()"))]
    pub key_extension: String,
}
