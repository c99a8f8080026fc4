//! Integration test: drive full navigation cycles through the explorer —
//! parse a URL bag, apply an intent, then re-parse the bag the navigator
//! received, the way the real render loop does.

use emberview_core::{
    ExplorerStore, ExplorerView, FixedClockResolver, MemoryStore, Navigator, ParameterBag,
    ProfileExplorer, ProfileSelection, Side, ViewMode, intents, parse_side,
};

const NOW_MS: i64 = 1_700_000_000_000;

#[derive(Default)]
struct RecordingNavigator {
    calls: Vec<(String, ParameterBag)>,
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&mut self, path: &str, params: ParameterBag) {
        self.calls.push((path.to_string(), params));
    }
}

fn explorer() -> ProfileExplorer<RecordingNavigator, MemoryStore, FixedClockResolver> {
    ProfileExplorer::new(
        RecordingNavigator::default(),
        MemoryStore::default(),
        FixedClockResolver { now_ms: NOW_MS },
    )
}

fn resolver() -> FixedClockResolver {
    FixedClockResolver { now_ms: NOW_MS }
}

fn last_bag(
    explorer: &ProfileExplorer<RecordingNavigator, MemoryStore, FixedClockResolver>,
) -> ParameterBag {
    let (path, bag) = explorer
        .navigator()
        .calls
        .last()
        .expect("an intent should have navigated");
    assert_eq!(path, "/");
    bag.clone()
}

#[test]
fn single_query_cycle() {
    let mut explorer = explorer();

    // Fresh landing: no params at all. The date range defaults.
    let view = explorer.sync(&ParameterBag::new());
    let ExplorerView::Single { query, selection } = view else {
        panic!("empty bag should render the single view");
    };
    assert!(selection.is_none());
    assert_eq!(query.time_selection, "last-hour");
    assert_eq!(query.to, NOW_MS as f64);
    assert_eq!(query.from, (NOW_MS - 3_600_000) as f64);

    // User runs a query; the bag the navigator gets re-parses to it.
    let wanted = emberview_core::Query {
        expression: "process_cpu{job=\"api\"}".into(),
        from: 100.0,
        to: 200.0,
        merge: false,
        profile_name: "cpu".into(),
        time_selection: "last-hour".into(),
    };
    explorer.run_query(&ParameterBag::new(), &wanted);
    let next = last_bag(&explorer);
    let view = explorer.sync(&next);
    let ExplorerView::Single { query, .. } = view else {
        panic!("still single after a plain query");
    };
    assert_eq!(
        urlencoding::decode(&query.expression).unwrap(),
        wanted.expression
    );
    assert_eq!(query.from, 100.0);
    assert_eq!(query.to, 200.0);
}

#[test]
fn parsing_is_idempotent() {
    let bag = ParameterBag::from_query_str(
        "expression_a=cpu&from_a=100&to_a=200&merge_a=true&labels_a=x&labels_a=y&time_a=150",
    );
    let first = parse_side(&bag, Side::A, &resolver());
    let second = parse_side(&bag, Side::A, &resolver());
    assert_eq!(first, second);
}

#[test]
fn select_profile_round_trips_through_the_bag() {
    let bag = ParameterBag::from_query_str(
        "compare_a=true&compare_b=true&expression_a=cpu&from_a=1&to_a=2\
         &expression_b=mem&from_b=3&to_b=4",
    );
    let picked = ProfileSelection::from_params(
        "heap_alloc{pod=\"web-1\"}",
        100.0,
        200.0,
        false,
        vec!["job=api".into(), "region=eu".into()],
        "alloc",
        Some("150".into()),
    )
    .expect("expression is non-empty");

    let next = intents::select_profile(&bag, Side::B, &picked);
    let state = parse_side(&next, Side::B, &resolver());
    let recovered = state.selection.expect("selection should survive");

    assert_eq!(
        urlencoding::decode(&recovered.expression).unwrap(),
        picked.expression
    );
    assert_eq!(recovered.from, picked.from);
    assert_eq!(recovered.to, picked.to);
    assert_eq!(recovered.merge, picked.merge);
    assert_eq!(recovered.labels, picked.labels);
    assert_eq!(recovered.profile_name, picked.profile_name);
    assert_eq!(recovered.time, picked.time);
}

#[test]
fn compare_cycle_enter_then_close() {
    let mut explorer = explorer();
    let single = ParameterBag::from_query_str(
        "expression_a=foo&from_a=100&to_a=200&merge_a=false&time_selection_a=last-hour",
    );
    explorer.sync(&single);
    let transitions_before = explorer.store().transitions();

    // Enter compare: one batched dispatch, both sides seeded alike.
    explorer.enter_compare(&single);
    assert_eq!(explorer.store().transitions(), transitions_before + 1);
    assert!(explorer.store().compare_mode());
    assert_eq!(explorer.store().search_node(), None);

    let comparing = last_bag(&explorer);
    assert_eq!(comparing.get_str("compare_a"), Some("true"));
    assert_eq!(comparing.get_str("compare_b"), Some("true"));
    assert_eq!(comparing.get_str("from_b"), Some("100"));
    assert_eq!(comparing.get_str("to_b"), Some("200"));
    assert_eq!(
        urlencoding::decode(comparing.get_str("expression_b").unwrap()).unwrap(),
        "foo"
    );

    let view = explorer.sync(&comparing);
    assert_eq!(view.mode(), ViewMode::Compare);

    // Run a new query on side B, then close A: B's state survives on A's keys.
    let fresh = emberview_core::Query {
        expression: "mem_alloc".into(),
        from: 300.0,
        to: 400.0,
        merge: false,
        profile_name: String::new(),
        time_selection: "last-hour".into(),
    };
    explorer.run_compare_query(&comparing, Side::B, &fresh);
    let comparing = last_bag(&explorer);
    assert_eq!(comparing.get_str("from_b"), Some("300"));
    // side A untouched by B's query
    assert_eq!(comparing.get_str("from_a"), Some("100"));

    explorer.close_side(&comparing, Side::A);
    assert!(!explorer.store().compare_mode());

    let closed = last_bag(&explorer);
    assert!(closed.keys().all(|k| !k.ends_with("_b")));
    assert_eq!(closed.get_str("compare_a"), Some("false"));
    assert_eq!(closed.get_str("from_a"), Some("300"));
    assert_eq!(
        urlencoding::decode(closed.get_str("expression_a").unwrap()).unwrap(),
        "mem_alloc"
    );

    let view = explorer.sync(&closed);
    assert_eq!(view.mode(), ViewMode::Single);
}

#[test]
fn malformed_numbers_flow_through_as_nan() {
    let mut explorer = explorer();
    let bag = ParameterBag::from_query_str("expression_a=cpu&from_a=abc&to_a=200");
    let ExplorerView::Single { query, .. } = explorer.sync(&bag) else {
        panic!("single view expected");
    };
    assert!(query.from.is_nan());
    assert_eq!(query.to, 200.0);
}
