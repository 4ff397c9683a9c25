// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rendering behaviour of the bundled dashboards

use dashbind::dom::NodeId;
use dashbind::i18n::{Lang, LocalizationTable};
use dashbind::render::{render, DashboardSchema, RenderedPage};
use dashbind::report::OutputFormat;
use dashbind::style::StylePresets;
use dashbind::types::DataDocument;
use serde_json::{json, Value};

fn render_bundled(name: &str, data: Value) -> RenderedPage {
    let schema = DashboardSchema::bundled(name).unwrap();
    let document = DataDocument::from_value(data).unwrap();
    render(
        &schema,
        &document,
        &LocalizationTable::builtin(Lang::Ja),
        &StylePresets::builtin(),
    )
}

fn by_class(page: &RenderedPage, class: &str) -> Vec<NodeId> {
    page.doc.find_by_class(page.doc.root(), class)
}

#[test]
fn overfull_progress_is_clamped_but_labelled() {
    let page = render_bundled(
        "project-view",
        json!({
            "departments": [{"id": "all", "name": "All"}],
            "projects": [{"id": "x1", "name": "CRM", "department": "sales", "status": "active", "progress": 137}]
        }),
    );
    let fills = by_class(&page, "progress-fill");
    assert_eq!(fills.len(), 1);
    assert_eq!(page.doc.style(fills[0]), Some("width: 100%;"));

    let labels = by_class(&page, "progress-label");
    assert_eq!(page.doc.text_content(labels[0]), "137%");
}

#[test]
fn implementation_detail_comes_first() {
    let page = render_bundled(
        "data-layer",
        json!({
            "projects": [],
            "dataSources": [{
                "id": "d1",
                "name": "Orders DB",
                "section": "ecommerce",
                "size": "2TB",
                "records": "40M",
                "implementation": "PostgreSQL 15"
            }]
        }),
    );
    let details = by_class(&page, "detail-item");
    let fields: Vec<&str> = details
        .iter()
        .map(|node| page.doc.attr(*node, "data-field").unwrap_or_default())
        .collect();
    assert_eq!(fields, vec!["implementation", "size", "records"]);
}

#[test]
fn absent_optional_fields_emit_nothing() {
    let page = render_bundled(
        "application-layer",
        json!({
            "projects": [{"id": "p1", "name": "Alpha"}],
            "applications": [{"id": "a1", "name": "Orders", "projects": ["p1"]}]
        }),
    );
    assert_eq!(page.cards.len(), 1);
    assert!(by_class(&page, "card-subtitle").is_empty());
    assert!(by_class(&page, "card-chips").is_empty());
    assert!(by_class(&page, "card-icon").is_empty());
    assert_eq!(page.doc.attr(page.cards[0], "data-tags"), Some("p1"));
}

#[test]
fn empty_groups_are_omitted() {
    let page = render_bundled(
        "data-layer",
        json!({
            "dataSources": [
                {"id": "d1", "name": "Shop", "section": "ecommerce"},
                {"id": "d2", "name": "Lake", "section": "dwh"},
                {"id": "d3", "name": "Cart", "section": "ecommerce"}
            ]
        }),
    );
    let groups: Vec<&str> = by_class(&page, "card-group")
        .iter()
        .map(|node| page.doc.attr(*node, "data-group").unwrap_or_default())
        .collect();
    assert_eq!(groups, vec!["ecommerce", "dwh"]);
    assert_eq!(page.cards.len(), 3);
}

#[test]
fn table_rows_follow_document_order() {
    let page = render_bundled(
        "it-portfolio",
        json!({
            "projects": [
                {"id": "b", "name": "Billing", "status": "on-track", "progress": 60, "goal": "efficiency"},
                {"id": "a", "name": "Analytics", "status": "at-risk", "progress": 20}
            ],
            "risks": [{"level": "high", "titleJA": "遅延", "titleEN": "Delay"}],
            "milestones": [{"date": "2025-03-15", "titleJA": "稼働", "titleEN": "Go-live"}]
        }),
    );
    let rows: Vec<&str> = by_class(&page, "table-row")
        .iter()
        .map(|node| page.doc.attr(*node, "data-id").unwrap_or_default())
        .collect();
    assert_eq!(rows, vec!["b", "a"]);

    let milestone = by_class(&page, "feed-title")
        .into_iter()
        .map(|node| page.doc.text_content(node))
        .find(|text| text.contains("Go-live"))
        .unwrap();
    assert_eq!(milestone, "3月15日: 稼働Mar 15: Go-live");
}

#[test]
fn risk_levels_without_labels_keep_a_prefix() {
    let page = render_bundled(
        "it-portfolio",
        json!({
            "risks": [
                {"level": "high", "titleJA": "遅延", "titleEN": "Delay"},
                {"level": "critical", "titleJA": "停止", "titleEN": "Outage"},
                {"titleJA": "不明", "titleEN": "Unknown"}
            ]
        }),
    );
    let titles: Vec<String> = by_class(&page, "feed-title")
        .into_iter()
        .map(|node| page.doc.text_content(node))
        .collect();
    assert_eq!(
        titles,
        vec![
            "【高】遅延[High] Delay",
            "【critical】停止[Critical] Outage",
            "不明Unknown",
        ]
    );
}

#[test]
fn first_layer_starts_expanded() {
    let page = render_bundled(
        "tbm-tower",
        json!({
            "layers": [
                {"id": "solution", "name": "Solutions", "sections": [
                    {"title": "Apps", "items": [{"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}, {"name": "E"}]}
                ]},
                {"id": "costpool", "name": "Cost pools", "sections": [
                    {"title": "Labour", "totalCost": "¥3M", "items": [{"name": "Staff", "cost": "¥3M"}]}
                ]}
            ]
        }),
    );
    assert_eq!(page.layers.len(), 2);
    let (first, _) = &page.layers[0];
    let (second, _) = &page.layers[1];
    assert!(page.doc.has_state_class(*first, "expanded"));
    assert!(!page.doc.has_state_class(*second, "expanded"));

    let grids: Vec<NodeId> = by_class(&page, "layer-section")
        .iter()
        .flat_map(|section| page.doc.children(*section).to_vec())
        .filter(|node| page.doc.has_class(*node, "grid"))
        .collect();
    assert!(page.doc.has_class(grids[0], "grid-cols-5"));
    assert!(page.doc.has_class(grids[1], "grid-cols-4"));

    let totals = by_class(&page, "section-total");
    assert_eq!(page.doc.text_content(totals[0]), " (¥3M)");
}

#[test]
fn every_label_carries_both_languages() {
    let page = render_bundled("it-portfolio", json!({}));
    let ja = by_class(&page, "lang-ja").len();
    let en = by_class(&page, "lang-en").len();
    assert!(ja > 0);
    assert_eq!(ja, en);
}

#[test]
fn missing_keys_render_as_paths() {
    let schema = DashboardSchema::bundled("application-layer").unwrap();
    let page = render(
        &schema,
        &DataDocument::default(),
        &LocalizationTable::empty(Lang::Ja),
        &StylePresets::builtin(),
    );
    let html = page.html();
    assert!(html.contains("app.title"));
    assert!(html.contains("app.sidebar"));
}

#[test]
fn html_output_escapes_data() {
    let page = render_bundled(
        "application-layer",
        json!({
            "projects": [{"id": "p1", "name": "<script>alert(1)</script>"}],
            "applications": []
        }),
    );
    let html = OutputFormat::Html.serialize(&page).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>alert(1)"));
}

#[test]
fn json_output_is_a_tree() {
    let page = render_bundled("it-portfolio", json!({}));
    let json = OutputFormat::Json.serialize(&page).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["dashboard"], "it-portfolio");
    assert_eq!(value["language"], "ja");
    assert_eq!(value["tree"]["tag"], "html");
}
