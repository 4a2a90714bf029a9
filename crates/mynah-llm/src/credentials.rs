//! API key lookup shared by the HTTP clients.

use mynah_core::error::{MynahError, MynahResult};

/// The configured key, else the provider's environment variable.
pub(crate) fn resolve_api_key(configured: Option<&str>, env_var: &str) -> MynahResult<String> {
    resolve_with(configured, env_var, |name| std::env::var(name).ok())
}

fn resolve_with<F>(configured: Option<&str>, env_var: &str, lookup: F) -> MynahResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    configured
        .filter(|key| !key.trim().is_empty())
        .map(str::to_string)
        .or_else(|| lookup(env_var).filter(|key| !key.trim().is_empty()))
        .ok_or_else(|| MynahError::missing(env_var))
}
