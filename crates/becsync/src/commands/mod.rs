//! Command handlers.

pub mod elements;
pub mod object;
pub mod sync;

use becsync_api::BecsClient;
use becsync_config::Config;
use becsync_core::Becs;

use crate::error::CliError;

/// Build the BECS facade, opening a session only when one will actually
/// be used (a tree refresh, or a cache miss that forces one).
async fn becs_session(config: &Config, needs_session: bool) -> Result<Becs, CliError> {
    let client = BecsClient::new(config.becs_url()?, &config.transport_config())?;
    let mut becs = Becs::new(client, config.sync_config());
    if needs_session {
        becs.login(&config.becs_username()?, &config.becs_password()?)
            .await?;
    }
    Ok(becs)
}

async fn close_session(becs: &mut Becs) {
    if let Err(err) = becs.logout().await {
        tracing::debug!(%err, "BECS logout failed");
    }
}
