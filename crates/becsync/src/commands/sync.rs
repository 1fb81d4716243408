//! `becsync sync` -- the reconciliation run.

use becsync_api::NetboxClient;
use becsync_config::Config;
use becsync_core::{naming, NetboxMirror, Reconciler};

use crate::cli::SyncArgs;
use crate::error::CliError;

pub async fn handle(args: SyncArgs, config: &Config) -> Result<(), CliError> {
    let sync_config = config.sync_config();

    // Source side: desired state from BECS.
    let needs_session = args.refresh_source || !sync_config.source_cache_path().is_file();
    let mut becs = super::becs_session(config, needs_session).await?;
    let desired = becs.get_devices(args.refresh_source).await?;
    super::close_session(&mut becs).await;

    // Target side: the mirrored NetBox device set.
    let netbox = NetboxClient::new(
        config.netbox_url()?,
        &config.netbox_token()?,
        &config.transport_config(),
    )?;
    let mut mirror = NetboxMirror::new(sync_config.target_cache_path());
    mirror
        .get_devices(&netbox, Some(&sync_config.device_tag), args.refresh_target)
        .await?;

    // --name accepts a short name and qualifies it like the source does.
    let only = args
        .name
        .as_deref()
        .map(|n| naming::fqdn(&n.to_lowercase(), &sync_config.default_domain));

    let mut reconciler = Reconciler::new(&netbox, &mut mirror, &sync_config);
    let report = reconciler.run(&desired, only.as_deref()).await?;

    for err in &report.errors {
        eprintln!("rejected: {err}");
    }
    println!(
        "{} mutation(s) applied, {} rejected",
        report.mutations,
        report.errors.len()
    );
    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::SyncIncomplete {
            failed: report.errors.len(),
        })
    }
}
