//! Wire a [`DirectoryContext`] from configuration

use std::sync::Arc;

use dirgraph_core::{AccessToken, ConfirmationPrompt, DirectoryContext};
use dirgraph_domain::{Config, Result};
use tracing::info;

use crate::http::ReqwestTransport;
use crate::prompt::ConsolePrompt;

/// Context over reqwest with a console prompt on stdin/stderr.
///
/// # Errors
/// Returns `DirectoryError::Config` for an invalid configuration; HTTP client
/// construction failures are propagated.
pub fn connect(config: &Config) -> Result<Arc<DirectoryContext>> {
    connect_with_prompt(config, Arc::new(ConsolePrompt::stdio()))
}

/// As [`connect`], with a caller-supplied confirmation prompt.
///
/// # Errors
/// See [`connect`].
pub fn connect_with_prompt(
    config: &Config,
    prompt: Arc<dyn ConfirmationPrompt>,
) -> Result<Arc<DirectoryContext>> {
    config.validate()?;

    let transport = ReqwestTransport::from_config(&config.http)?;
    let context = DirectoryContext::builder()
        .base_url(config.api.base_url.as_str())
        .tenant(config.api.tenant.as_str())
        .token(AccessToken::new(config.api.access_token.as_str()))
        .next_link_field(config.api.next_link_field.as_str())
        .transport(Arc::new(transport))
        .prompt(prompt)
        .build()?;

    info!(base_url = %context.base_url(), tenant = %context.tenant(), "directory context ready");
    Ok(context)
}
