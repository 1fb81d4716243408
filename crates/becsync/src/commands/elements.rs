//! `becsync elements` -- print the desired device set.

use becsync_config::Config;

use crate::cli::ElementsArgs;
use crate::error::CliError;

pub async fn handle(args: ElementsArgs, config: &Config) -> Result<(), CliError> {
    let sync_config = config.sync_config();
    let needs_session = args.refresh || !sync_config.source_cache_path().is_file();
    let mut becs = super::becs_session(config, needs_session).await?;
    let desired = becs.get_devices(args.refresh).await?;
    super::close_session(&mut becs).await;

    println!(
        "{:<40} {:>10} {:<14} {:>7}  PARENTS",
        "NAME", "OID", "MODEL", "IFACES"
    );
    for (name, device) in desired.iter() {
        println!(
            "{:<40} {:>10} {:<14} {:>7}  {}",
            name,
            device.oid,
            device.model,
            device.interfaces.len(),
            device.parents.join(",")
        );
    }
    Ok(())
}
