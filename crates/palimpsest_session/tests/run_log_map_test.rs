//! Live run-log bookkeeping on the session.

use palimpsest_core::{CallId, RunEvent, RunLogEntry, VersionId, VersionKey};
use palimpsest_session::{EditSession, fold_run_event};
use std::collections::BTreeMap;

#[test]
fn entries_under_different_call_ids_do_not_interfere() {
    let mut session = EditSession::new();
    let key = VersionKey::Version(VersionId::from("v1"));
    let a = CallId::from("a");
    let b = CallId::from("b");
    session.upsert_run(key.clone(), a.clone(), RunLogEntry::default());
    session.upsert_run(key.clone(), b.clone(), RunLogEntry::default());

    assert!(session.update_run(&key, &a, |entry| {
        *entry = fold_run_event(entry.clone(), &RunEvent::raw("from a")).entry;
        entry
            .parsed_outputs
            .insert("k".to_string(), "v".to_string());
    }));

    assert_eq!(session.run_log(&key, &a).unwrap().raw_output, "from a");
    assert_eq!(session.run_log(&key, &b).unwrap(), &RunLogEntry::default());
    assert_eq!(session.live_run_count(), 2);
}

#[test]
fn folding_is_order_preserving_per_call() {
    let parsed = |value: &str| RunEvent {
        parsed_outputs: Some(BTreeMap::from([("a".to_string(), value.to_string())])),
        ..Default::default()
    };

    let entry = fold_run_event(RunLogEntry::default(), &parsed("1")).entry;
    let entry = fold_run_event(entry, &parsed("2")).entry;
    let entry = fold_run_event(entry, &RunEvent::raw("He")).entry;
    let entry = fold_run_event(entry, &RunEvent::raw("llo")).entry;

    assert_eq!(entry.parsed_outputs["a"], "12");
    assert_eq!(entry.raw_output, "Hello");
}

#[test]
fn removing_the_last_run_drops_the_bucket() {
    let mut session = EditSession::new();
    let call = CallId::from("c");
    session.upsert_run(VersionKey::Draft, call.clone(), RunLogEntry::default());

    assert!(session.remove_run(&VersionKey::Draft, &call).is_some());
    assert!(session.runs_for(&VersionKey::Draft).is_none());
    assert!(session.remove_run(&VersionKey::Draft, &call).is_none());
    assert!(!session.update_run(&VersionKey::Draft, &call, |_| {}));
}

#[test]
fn rekey_moves_the_entry_with_its_contents() {
    let mut session = EditSession::new();
    let call = CallId::from("c");
    let entry = fold_run_event(RunLogEntry::default(), &RunEvent::raw("partial")).entry;
    session.upsert_run(VersionKey::Draft, call.clone(), entry.clone());

    let target = VersionKey::Version(VersionId::from("v5"));
    assert!(session.rekey_run(&VersionKey::Draft, target.clone(), &call));

    assert_eq!(session.run_log(&target, &call), Some(&entry));
    assert!(session.runs_for(&VersionKey::Draft).is_none());
}
