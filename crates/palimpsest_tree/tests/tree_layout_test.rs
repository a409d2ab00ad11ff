use chrono::Utc;
use palimpsest_core::{PromptBody, Version, VersionFields, VersionId};
use palimpsest_error::{PalimpsestErrorKind, TreeErrorKind};
use palimpsest_tree::{LayoutConfig, LayoutConfigBuilder, VersionTree, layout_versions, stratify};

fn version(id: &str, ordinal: u32, parent: Option<&str>, published: bool) -> Version {
    Version {
        id: id.into(),
        ordinal,
        from_version: parent.map(VersionId::from),
        is_published: published,
        tags: vec![],
        memo: None,
        author: None,
        created_at: Utc::now(),
        fields: VersionFields::new(PromptBody::SystemPrompt("You are helpful.".into()), "gpt-4"),
    }
}

fn tree_kind(versions: &[Version]) -> TreeErrorKind {
    match stratify(versions).unwrap_err().kind() {
        PalimpsestErrorKind::Tree(e) => e.kind.clone(),
        other => panic!("unexpected error: {other}"),
    }
}

fn square() -> LayoutConfig {
    LayoutConfigBuilder::default()
        .node_width(100.0)
        .node_height(50.0)
        .horizontal_gap(20.0)
        .vertical_gap(30.0)
        .viewport_width(1000.0)
        .viewport_height(600.0)
        .build()
        .unwrap()
}

#[test]
fn synthetic_root_holds_single_chain() {
    let versions = vec![version("1", 1, None, false), version("2", 2, Some("1"), false)];
    let tree = stratify(&versions).unwrap();

    let roots: Vec<_> = tree.nodes().iter().filter(|n| n.parent.is_none()).collect();
    assert_eq!(roots.len(), 1);
    assert!(roots[0].is_synthetic());

    let first = tree.root().children.clone();
    assert_eq!(first.len(), 1);
    assert_eq!(tree.nodes()[first[0]].version, Some("1".into()));
    let second = &tree.nodes()[first[0]].children;
    assert_eq!(second.len(), 1);
    assert_eq!(tree.nodes()[second[0]].version, Some("2".into()));
    assert!(tree.nodes()[second[0]].children.is_empty());

    let layout = layout_versions(&versions, &LayoutConfig::default()).unwrap();
    let ids: Vec<_> = layout.nodes.iter().map(|n| n.id.to_string()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(layout.edges.len(), 1);
    assert_eq!(layout.edges[0].source, VersionId::from("1"));
    assert_eq!(layout.edges[0].target, VersionId::from("2"));
}

#[test]
fn parentless_versions_share_the_synthetic_root() {
    let versions = vec![
        version("a", 1, None, false),
        version("b", 2, None, false),
        version("c", 3, Some("a"), false),
    ];
    let tree = stratify(&versions).unwrap();
    assert_eq!(tree.root().children.len(), 2);
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.node(VersionTree::ROOT).unwrap().depth, 0);

    let layout = layout_versions(&versions, &LayoutConfig::default()).unwrap();
    assert_eq!(layout.edges.len(), 1);
    assert_eq!(layout.node(&"a".into()).unwrap().parent, None);
    assert_eq!(layout.node(&"b".into()).unwrap().depth, 0);
    assert_eq!(layout.node(&"c".into()).unwrap().depth, 1);
}

#[test]
fn duplicate_ids_are_rejected() {
    let kind = tree_kind(&[version("a", 1, None, false), version("a", 2, None, false)]);
    assert_eq!(kind, TreeErrorKind::DuplicateId("a".into()));
}

#[test]
fn unresolved_parents_are_rejected() {
    let kind = tree_kind(&[version("a", 1, None, false), version("b", 2, Some("zz"), false)]);
    assert_eq!(
        kind,
        TreeErrorKind::MissingParent {
            child: "b".into(),
            parent: "zz".into()
        }
    );
}

#[test]
fn parent_cycles_are_rejected() {
    let kind = tree_kind(&[
        version("root", 1, None, false),
        version("x", 2, Some("y"), false),
        version("y", 3, Some("x"), false),
        version("tail", 4, Some("x"), false),
    ]);
    assert!(matches!(kind, TreeErrorKind::Cycle(ref id) if id == "x" || id == "y"));
}

#[test]
fn parents_are_centered_over_their_children() {
    let versions = vec![
        version("a", 1, None, true),
        version("b", 2, Some("a"), false),
        version("c", 3, Some("a"), false),
        version("d", 4, Some("a"), false),
    ];
    let layout = layout_versions(&versions, &square()).unwrap();
    let x = |id: &str| layout.node(&id.into()).unwrap().x;
    let y = |id: &str| layout.node(&id.into()).unwrap().y;

    assert_eq!(x("c") - x("b"), 120.0);
    assert_eq!(x("d") - x("c"), 120.0);
    assert_eq!(x("a"), x("c"));
    assert_eq!(y("b") - y("a"), 80.0);
    assert_eq!(y("b"), y("d"));
}

#[test]
fn children_follow_ordinal_order() {
    let versions = vec![
        version("a", 1, None, false),
        version("late", 5, Some("a"), false),
        version("early", 2, Some("a"), false),
    ];
    let layout = layout_versions(&versions, &square()).unwrap();
    let early = layout.node(&"early".into()).unwrap();
    let late = layout.node(&"late".into()).unwrap();
    assert!(early.x < late.x);
}

#[test]
fn published_version_is_centered_in_viewport() {
    let config = square();
    let versions = vec![
        version("a", 1, None, false),
        version("b", 2, Some("a"), false),
        version("c", 3, Some("a"), true),
        version("d", 4, Some("c"), false),
    ];
    let layout = layout_versions(&versions, &config).unwrap();
    assert_eq!(layout.focus, Some("c".into()));

    let c = layout.node(&"c".into()).unwrap();
    assert_eq!(c.x + 50.0, 500.0);
    assert_eq!(c.y + 25.0, 300.0);
}

#[test]
fn first_root_is_centered_without_published_version() {
    let versions = vec![
        version("b", 2, None, false),
        version("a", 1, None, false),
        version("c", 3, Some("b"), false),
    ];
    let layout = layout_versions(&versions, &square()).unwrap();
    assert_eq!(layout.focus, Some("a".into()));
    let a = layout.node(&"a".into()).unwrap();
    assert_eq!(a.x + 50.0, 500.0);
}

#[test]
fn layout_serializes_for_rendering() {
    let layout = layout_versions(&[version("1", 1, None, true)], &square()).unwrap();
    let json = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["nodes"][0]["id"], "1");
    assert_eq!(json["focus"], "1");
    assert!(json["edges"].as_array().unwrap().is_empty());
}
