//! `becsync object` -- dump one BECS object for debugging.

use becsync_config::Config;

use crate::cli::ObjectArgs;
use crate::error::CliError;

pub async fn handle(args: ObjectArgs, config: &Config) -> Result<(), CliError> {
    let mut becs = super::becs_session(config, true).await?;
    let found = becs.object(args.oid).await;
    super::close_session(&mut becs).await;

    match found? {
        Some(object) => {
            println!("{}", serde_json::to_string_pretty(&object)?);
            Ok(())
        }
        None => Err(CliError::NotFound {
            resource_type: "BECS object".into(),
            identifier: args.oid.to_string(),
        }),
    }
}
