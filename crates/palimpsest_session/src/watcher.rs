//! Reacting to realtime change notices.

use crate::actions::VersionActions;
use crate::config::SessionConfig;
use futures_util::StreamExt;
use palimpsest_core::{ChangeScope, VersionKey};
use palimpsest_error::PalimpsestResult;
use palimpsest_interface::ChangeFeed;
use tokio_util::sync::CancellationToken;

/// Follow the configured change channel until the feed ends or `cancel` fires.
///
/// Version notices refetch the list. A notice naming the selected version
/// also re-seeds the draft, but only while the draft is unmodified so no
/// edits are lost. Run-log notices naming a version are passed to the
/// observer as run-log invalidations. Refetch failures are logged and the
/// watch continues. Returns the number of notices handled.
#[tracing::instrument(skip_all, fields(channel = %config.changes_channel()))]
pub async fn watch_changes(
    actions: &VersionActions,
    feed: &dyn ChangeFeed,
    config: &SessionConfig,
    cancel: CancellationToken,
) -> PalimpsestResult<usize> {
    let mut notices = feed.subscribe(config.changes_channel()).await?;
    let mut handled = 0;

    loop {
        let notice = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            notice = notices.next() => match notice {
                Some(notice) => notice,
                None => break,
            },
        };
        handled += 1;

        if notice.scope == ChangeScope::RunLogs {
            match notice.version_id {
                Some(id) => actions
                    .observer()
                    .on_run_logs_invalidated(&VersionKey::Version(id)),
                None => tracing::debug!("Run-log notice without a version id"),
            }
            continue;
        }

        if let Err(err) = actions.refresh_versions().await {
            tracing::warn!(error = %err, "Refetch after change notice failed");
            continue;
        }

        let reseed = {
            let session = actions.session().read().await;
            let unmodified = session
                .status()
                .is_some_and(|status| status.is_equal_to_original);
            match (&notice.version_id, session.selected_id()) {
                (Some(changed), Some(selected)) if changed == selected && unmodified => {
                    Some(selected.clone())
                }
                _ => None,
            }
        };
        if let Some(id) = reseed
            && let Err(err) = actions.load_version(&id).await
        {
            tracing::warn!(version = %id, error = %err, "Re-seeding after change notice failed");
        }
    }

    tracing::debug!(handled, "Stopped watching changes");
    Ok(handled)
}
