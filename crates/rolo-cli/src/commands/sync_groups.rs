use rolo_core::groups::{sync_groups, GroupAction, GroupSyncOutcome};
use rolo_core::icloud::{fetch_and_cache, ContactsService, SyncSession};

use crate::commands::common::Context;
use crate::error::CliError;

pub async fn sync_remote_groups(
    ctx: &Context,
    service: &dyn ContactsService,
) -> Result<Vec<GroupSyncOutcome>, CliError> {
    let contacts = ctx.store().load_contacts()?;
    let mut session = SyncSession::new();
    let snapshot = fetch_and_cache(service, &mut session, &ctx.cache()).await?;
    Ok(sync_groups(service, &mut session, &contacts, snapshot.groups).await?)
}

pub async fn run_sync_groups(ctx: &Context) -> Result<(), CliError> {
    let client = ctx.remote_client()?;
    let outcomes = sync_remote_groups(ctx, &client).await?;
    for outcome in outcomes {
        let action = match outcome.action {
            GroupAction::Created => "created",
            GroupAction::Updated => "updated",
        };
        println!("{}: {action} ({} members)", outcome.name, outcome.members);
    }
    Ok(())
}
