// SPDX-License-Identifier: PMPL-1.0-or-later

//! Interaction scenarios driven through `DashboardSession`

use dashbind::config::Configuration;
use dashbind::i18n::Lang;
use dashbind::render::DashboardSchema;
use dashbind::session::{
    active_controls, active_items, DashboardSession, SelectionState,
};
use dashbind::source::{FetchError, FetchResponse, MemoryFetcher};
use dashbind::storage::{MemoryStore, PreferenceStore, LANGUAGE_KEY};
use serde_json::json;

fn session(dashboard: &str) -> DashboardSession<MemoryStore> {
    session_with_store(dashboard, MemoryStore::new())
}

fn session_with_store(dashboard: &str, store: MemoryStore) -> DashboardSession<MemoryStore> {
    let schema = DashboardSchema::bundled(dashboard).expect("bundled dashboard");
    DashboardSession::new(schema, Configuration::builtin(), store)
}

fn application_data() -> String {
    json!({
        "projects": [
            {"id": "p1", "name": "Alpha", "progress": 40},
            {"id": "p2", "nameJA": "ベータ", "nameEN": "Beta", "progress": 75}
        ],
        "applications": [
            {"id": "a1", "nameJA": "受注", "nameEN": "Orders", "projects": ["p1"], "eolStatus": "ok"},
            {"id": "a2", "nameJA": "会計", "nameEN": "Ledger", "projects": ["p2"], "eolStatus": "critical"},
            {"id": "a3", "nameJA": "共通基盤", "nameEN": "Platform", "projects": ["p1", "p2"]}
        ]
    })
    .to_string()
}

fn fetcher_for(data: String) -> MemoryFetcher {
    MemoryFetcher::new()
        .with("./application_layer_view_data.json", FetchResponse::status(404))
        .with("../data/application_layer_view_data.json", FetchResponse::ok(data))
}

fn card_id(session: &DashboardSession<MemoryStore>, card: dashbind::dom::NodeId) -> String {
    session
        .page()
        .doc
        .attr(card, "data-id")
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn select_highlights_only_tagged_cards() {
    let mut session = session("application-layer");
    session.load(&fetcher_for(application_data())).await.unwrap();

    assert_eq!(session.summary().source.as_deref(), Some("../data/application_layer_view_data.json"));
    assert_eq!(session.page().cards.len(), 3);

    let highlighted = session.select("p1");
    assert_eq!(highlighted, 2);
    let ids: Vec<String> = session
        .highlighted()
        .into_iter()
        .map(|card| card_id(&session, card))
        .collect();
    assert_eq!(ids, vec!["a1", "a3"]);
    assert_eq!(session.title_annotation(), "Alpha");

    session.clear();
    assert_eq!(session.highlighted_count(), 0);
    assert_eq!(session.title_annotation(), "");
    assert_eq!(session.selection(), &SelectionState::Unselected);
}

#[tokio::test]
async fn two_application_scenario() {
    let data = json!({
        "projects": [{"id": "p1", "name": "Alpha"}],
        "applications": [
            {"id": "a1", "name": "One", "projects": ["p1"]},
            {"id": "a2", "name": "Two", "projects": ["p2"]}
        ]
    })
    .to_string();
    let mut session = session("application-layer");
    session.load(&fetcher_for(data)).await.unwrap();

    session.select("p1");
    let ids: Vec<String> = session
        .highlighted()
        .into_iter()
        .map(|card| card_id(&session, card))
        .collect();
    assert_eq!(ids, vec!["a1"]);
    assert_eq!(session.title_annotation(), "Alpha");

    session.clear();
    assert!(session.highlighted().is_empty());
    assert_eq!(session.title_annotation(), "");
}

#[test]
fn ids_with_ideographic_space_highlight() {
    let data = json!({
        "projects": [{"id": "新規\u{3000}A", "name": "New A"}, {"id": "新規", "name": "New"}],
        "applications": [
            {"id": "a1", "name": "One", "projects": ["新規\u{3000}A"]},
            {"id": "a2", "name": "Two", "projects": ["新規"]}
        ]
    });
    let mut session = session("application-layer");
    session.install_document(dashbind::types::DataDocument::from_value(data).unwrap(), None);

    assert_eq!(session.select("新規\u{3000}A"), 1);
    let card = session.highlighted()[0];
    assert_eq!(card_id(&session, card), "a1");
    assert_eq!(session.select("新規"), 1);
}

#[tokio::test]
async fn highlight_count_tracks_final_selection() {
    let mut session = session("application-layer");
    session.load(&fetcher_for(application_data())).await.unwrap();

    session.select("p1");
    session.select("p2");
    session.clear();
    session.select("p2");
    assert_eq!(session.highlighted_count(), 2);
    assert_eq!(active_items(session.page()).len(), 1);

    session.select("p1");
    session.select("p1");
    assert_eq!(session.highlighted_count(), 2);

    session.select("unknown");
    assert_eq!(session.highlighted_count(), 0);
    assert!(active_items(session.page()).is_empty());
}

#[tokio::test]
async fn not_found_renders_single_error_fragment() {
    let mut session = session("application-layer");
    let fetcher = MemoryFetcher::new();
    let err = session.load(&fetcher).await.unwrap_err();

    match &err {
        FetchError::NotFound { candidates } => assert_eq!(candidates.len(), 4),
        other => panic!("unexpected error: {other:?}"),
    }
    let page = session.page();
    assert_eq!(page.error_fragments().len(), 1);
    assert_eq!(page.entity_fragment_count(), 0);

    let text = page.doc.text_content(page.error_fragments()[0]);
    assert!(text.contains("Failed to load dashboard data."));
    assert!(text.contains("• ./application_layer_view_data.json"));
    assert!(!session.summary().loaded);
}

#[tokio::test]
async fn transport_failure_is_typed_and_rendered() {
    let mut session = session("application-layer");
    let fetcher = MemoryFetcher::new()
        .with_failure("./application_layer_view_data.json", "connection refused");
    let err = session.load(&fetcher).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }));
    let page = session.page();
    assert_eq!(page.error_fragments().len(), 1);
    assert_eq!(page.entity_fragment_count(), 0);
    assert!(page
        .doc
        .text_content(page.error_fragments()[0])
        .contains("connection refused"));
}

#[tokio::test]
async fn failed_reload_drops_previous_document() {
    let mut session = session("application-layer");
    session.load(&fetcher_for(application_data())).await.unwrap();
    session.select("p1");

    let broken = MemoryFetcher::new().with(
        "./application_layer_view_data.json",
        FetchResponse::ok("{not json"),
    );
    let err = session.load(&broken).await.unwrap_err();
    assert!(matches!(err, FetchError::Parse { .. }));
    assert!(session.document().is_none());
    assert_eq!(session.selection(), &SelectionState::Unselected);
    assert_eq!(session.page().error_fragments().len(), 1);
}

#[tokio::test]
async fn language_round_trip_restores_page() {
    let mut session = session("application-layer");
    session.load(&fetcher_for(application_data())).await.unwrap();
    session.select("p2");

    let japanese = session.html();
    assert_eq!(session.title_annotation(), "ベータ");

    session.set_language(Lang::En, None);
    assert_eq!(session.title_annotation(), "Beta");
    assert_eq!(session.page().doc.attr(session.page().body, "data-lang"), Some("en"));
    assert_ne!(session.html(), japanese);

    session.set_language(Lang::Ja, None);
    assert_eq!(session.html(), japanese);
    assert_eq!(active_controls(session.page()).len(), 1);
}

#[tokio::test]
async fn stored_preference_wins_over_default() {
    let store = MemoryStore::new().with(LANGUAGE_KEY, "en");
    let mut session = session_with_store("application-layer", store);
    session.load(&fetcher_for(application_data())).await.unwrap();

    assert_eq!(session.load_preference(), Lang::En);
    let page = session.page();
    let (active, lang) = page.lang_controls[1];
    assert_eq!(lang, Lang::En);
    assert_eq!(active_controls(page), vec![active]);
}

#[test]
fn unsupported_stored_language_falls_back() {
    let store = MemoryStore::new().with(LANGUAGE_KEY, "fr");
    let mut session = session_with_store("application-layer", store);
    assert_eq!(session.load_preference(), Lang::Ja);
    assert_eq!(session.store().get(LANGUAGE_KEY).as_deref(), Some("ja"));
}

#[test]
fn clear_item_clears_selection() {
    let data = json!({
        "departments": [
            {"id": "all", "nameJA": "全部門", "nameEN": "All"},
            {"id": "sales", "nameJA": "営業", "nameEN": "Sales", "projectCount": 2},
            {"id": "ops", "nameJA": "運用", "nameEN": "Operations", "projectCount": 1}
        ],
        "projects": [
            {"id": "x1", "name": "CRM", "department": "sales", "status": "active", "progress": 30},
            {"id": "x2", "name": "EDI", "department": "sales", "status": "planning"},
            {"id": "x3", "name": "Backup", "department": "ops", "status": "completed"}
        ]
    });
    let mut session = session("project-view");
    session.install_document(
        dashbind::types::DataDocument::from_value(data).unwrap(),
        None,
    );

    assert_eq!(session.page().clear_controls.len(), 1);
    let ids: Vec<&str> = session.page().selectable_ids().collect();
    assert_eq!(ids, vec!["sales", "ops"]);

    assert_eq!(session.select("sales"), 2);
    assert_eq!(session.select("all"), 0);
    assert_eq!(session.selection(), &SelectionState::Unselected);

    session.select("ops");
    let clear = session.page().clear_controls[0];
    assert!(session.click(clear));
    assert_eq!(session.highlighted_count(), 0);
}

#[test]
fn layers_toggle_independently() {
    let data = json!({
        "projects": [{"id": "p1", "name": "ERP"}],
        "layers": [
            {"id": "solution", "name": "Solutions", "totalCost": "¥10M", "sections": [
                {"title": "Apps", "items": [{"name": "ERP suite", "cost": "¥4M", "projects": ["p1"]}]}
            ]},
            {"id": "tower", "name": "Towers", "sections": []},
            {"id": "costpool", "name": "Cost pools", "sections": []}
        ]
    });
    let mut session = session("tbm-tower");
    session.install_document(
        dashbind::types::DataDocument::from_value(data).unwrap(),
        None,
    );

    assert!(session.layers().is_expanded("solution"));
    assert!(!session.layers().is_expanded("tower"));

    assert_eq!(session.toggle_layer("tower"), Some(true));
    assert_eq!(session.toggle_layer("solution"), Some(false));
    assert_eq!(session.toggle_layer("missing"), None);
    let expanded: Vec<&str> = session.layers().expanded().collect();
    assert_eq!(expanded, vec!["tower"]);

    // layer items highlight like cards
    assert_eq!(session.select("p1"), 1);
    assert_eq!(session.summary().expanded_layers, vec!["tower".to_string()]);
}
