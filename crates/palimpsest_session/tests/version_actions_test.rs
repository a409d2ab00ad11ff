//! Save, publish, patch and change-watch flows against the in-memory backend.

use chrono::Utc;
use palimpsest_core::{
    ChangeNotice, ChangeScope, ProjectRef, PromptBody, PromptMessage, Role, Version,
    VersionFields, VersionId, VersionKey,
};
use palimpsest_error::{PalimpsestErrorKind, SessionErrorKind};
use palimpsest_interface::{InMemoryBackend, VersionWriter};
use palimpsest_session::{
    CancellationToken, EditSession, Observed, RecordingObserver, SessionConfig, SharedSession,
    VersionActions, watch_changes,
};
use std::sync::Arc;
use std::time::Duration;

fn version(id: &str, ordinal: u32, parent: Option<&str>, published: bool) -> Version {
    Version {
        id: VersionId::from(id),
        ordinal,
        from_version: parent.map(VersionId::from),
        is_published: published,
        tags: vec![],
        memo: None,
        author: Some("ada".into()),
        created_at: Utc::now(),
        fields: VersionFields::new(
            PromptBody::Prompts(vec![
                PromptMessage::new(Role::System, 1, "Summarize."),
                PromptMessage::new(Role::User, 2, "{text}"),
            ]),
            "gpt-3.5-turbo",
        ),
    }
}

fn setup() -> (InMemoryBackend, VersionActions, Arc<RecordingObserver>) {
    let backend = InMemoryBackend::with_versions(vec![
        version("v1", 1, None, true),
        version("v2", 2, Some("v1"), false),
    ]);
    let observer = Arc::new(RecordingObserver::new());
    let actions = VersionActions::new(
        EditSession::shared(),
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        observer.clone(),
    );
    (backend, actions, observer)
}

async fn wait_for<F>(session: &SharedSession, check: F)
where
    F: Fn(&EditSession) -> bool,
{
    for _ in 0..200 {
        if check(&*session.read().await) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn load_seeds_draft_from_fetched_version() {
    let (_backend, actions, _observer) = setup();
    assert_eq!(actions.refresh_versions().await.unwrap(), 2);
    actions.load_version(&"v2".into()).await.unwrap();

    let session = actions.session().read().await;
    assert_eq!(session.selected_id(), Some(&VersionId::from("v2")));
    assert_eq!(session.draft(), Some(&session.original().unwrap().fields));
    assert_eq!(session.published_version().unwrap().id, VersionId::from("v1"));
}

#[tokio::test]
async fn fetch_failures_leave_session_unchanged() {
    let (backend, actions, _observer) = setup();
    actions.refresh_versions().await.unwrap();
    actions.load_version(&"v1".into()).await.unwrap();

    let err = actions.load_version(&"missing".into()).await.unwrap_err();
    assert!(matches!(err.kind(), PalimpsestErrorKind::Backend(_)));

    backend.set_unavailable(true).await;
    assert!(actions.refresh_versions().await.is_err());

    let session = actions.session().read().await;
    assert_eq!(session.selected_id(), Some(&VersionId::from("v1")));
    assert_eq!(session.versions().len(), 2);
}

#[tokio::test]
async fn save_creates_version_and_refuses_a_duplicate() {
    let (backend, actions, observer) = setup();
    actions.load_version(&"v1".into()).await.unwrap();
    actions.session().write().await.set_model("gpt-4").unwrap();

    let created = actions.save_draft().await.unwrap();
    assert_eq!(created.ordinal, 3);
    assert_eq!(created.from_version, Some(VersionId::from("v1")));
    assert_eq!(created.fields.model, "gpt-4");
    assert_eq!(observer.toasts()[0].message, "Saved version 3");

    {
        let session = actions.session().read().await;
        assert_eq!(session.cache().unwrap().id, created.id);
        assert_eq!(session.versions().len(), 3);
        assert!(!session.status().unwrap().can_save);
    }

    let err = actions.save_draft().await.unwrap_err();
    match err.kind() {
        PalimpsestErrorKind::Session(e) => {
            assert!(matches!(e.kind, SessionErrorKind::NotSavable(_)))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(backend.versions().await.len(), 3);

    actions.session().write().await.set_model("gpt-4o").unwrap();
    assert!(actions.session().read().await.cache().is_none());
    assert_eq!(actions.save_draft().await.unwrap().ordinal, 4);
}

#[tokio::test]
async fn unchanged_draft_cannot_be_saved() {
    let (backend, actions, _observer) = setup();
    actions.load_version(&"v1".into()).await.unwrap();
    assert!(actions.save_draft().await.is_err());
    assert_eq!(backend.versions().await.len(), 2);
}

#[tokio::test]
async fn publish_names_previously_published_version() {
    let (backend, actions, observer) = setup();
    actions.refresh_versions().await.unwrap();
    actions.load_version(&"v2".into()).await.unwrap();

    actions
        .publish_selected(ProjectRef {
            id: "proj-1".into(),
            name: "Summaries".into(),
        })
        .await
        .unwrap();

    let requests = backend.publish_requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].version_id, VersionId::from("v2"));
    assert_eq!(
        requests[0].previous_published_version_id,
        Some(VersionId::from("v1"))
    );
    assert_eq!(
        actions.session().read().await.published_version().unwrap().id,
        VersionId::from("v2")
    );
    assert_eq!(observer.toasts()[0].message, "Published");
}

#[tokio::test]
async fn memo_and_tags_are_patched_and_refetched() {
    let (_backend, actions, _observer) = setup();
    actions
        .update_memo(&"v1".into(), Some("baseline".into()))
        .await
        .unwrap();
    actions
        .update_tags(&"v2".into(), vec!["candidate".into()])
        .await
        .unwrap();

    let session = actions.session().read().await;
    let versions = session.versions();
    assert_eq!(versions[0].memo.as_deref(), Some("baseline"));
    assert_eq!(versions[1].tags, vec!["candidate".to_string()]);
}

#[tokio::test]
async fn watcher_refetches_on_version_changes() {
    let (backend, actions, _observer) = setup();
    let cancel = CancellationToken::new();

    let config = SessionConfig::default();
    let (handled, ()) = tokio::join!(
        watch_changes(&actions, &backend, &config, cancel.clone()),
        async {
            backend
                .create_version(&palimpsest_core::CreateVersionRequest {
                    fields: version("x", 0, None, false).fields,
                    from_version: Some("v2".into()),
                })
                .await
                .unwrap();
            wait_for(actions.session(), |s| s.versions().len() == 3).await;
            cancel.cancel();
        }
    );

    assert_eq!(handled.unwrap(), 1);
}

#[tokio::test]
async fn watcher_reseeds_unmodified_selection_only() {
    let (backend, actions, _observer) = setup();
    actions.load_version(&"v1".into()).await.unwrap();
    let cancel = CancellationToken::new();

    let config = SessionConfig::default();
    let (handled, ()) = tokio::join!(
        watch_changes(&actions, &backend, &config, cancel.clone()),
        async {
            backend
                .update_memo(&"v1".into(), Some("edited elsewhere".into()))
                .await
                .unwrap();
            backend
                .notify(ChangeNotice {
                    scope: ChangeScope::Versions,
                    version_id: Some("v1".into()),
                })
                .await;
            wait_for(actions.session(), |s| {
                s.original()
                    .is_some_and(|v| v.memo.as_deref() == Some("edited elsewhere"))
            })
            .await;

            actions.session().write().await.set_model("gpt-4").unwrap();
            backend
                .update_tags(&"v1".into(), vec!["stable".into()])
                .await
                .unwrap();
            backend
                .notify(ChangeNotice {
                    scope: ChangeScope::Versions,
                    version_id: Some("v1".into()),
                })
                .await;
            wait_for(actions.session(), |s| {
                s.versions().iter().any(|v| v.tags == vec!["stable".to_string()])
            })
            .await;
            cancel.cancel();
        }
    );

    assert_eq!(handled.unwrap(), 2);
    let session = actions.session().read().await;
    assert_eq!(session.draft().unwrap().model, "gpt-4");
    assert!(session.original().unwrap().tags.is_empty());
}

#[tokio::test]
async fn watcher_forwards_run_log_notices_to_the_observer() {
    let (backend, actions, observer) = setup();
    let cancel = CancellationToken::new();

    let config = SessionConfig::default();
    let (handled, ()) = tokio::join!(
        watch_changes(&actions, &backend, &config, cancel.clone()),
        async {
            backend
                .notify(ChangeNotice {
                    scope: ChangeScope::RunLogs,
                    version_id: Some("v1".into()),
                })
                .await;
            backend
                .notify(ChangeNotice {
                    scope: ChangeScope::RunLogs,
                    version_id: None,
                })
                .await;
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        }
    );

    assert_eq!(handled.unwrap(), 2);
    assert_eq!(
        observer.events(),
        vec![Observed::RunLogsInvalidated {
            version: VersionKey::Version("v1".into()),
        }]
    );
    assert!(actions.session().read().await.versions().is_empty());
}

#[tokio::test]
async fn watcher_subscribes_to_the_configured_channel() {
    let (backend, actions, _observer) = setup();
    let config = SessionConfig::default().with_changes_channel("prompt-versions".to_string());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let handled = watch_changes(&actions, &backend, &config, cancel).await;

    assert_eq!(handled.unwrap(), 0);
    assert_eq!(backend.subscribed_channels().await, vec!["prompt-versions"]);
}
