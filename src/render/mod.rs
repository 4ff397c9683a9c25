// SPDX-License-Identifier: PMPL-1.0-or-later

//! Schema-driven view renderer.
//!
//! [`render`] walks a [`DashboardSchema`] against a [`DataDocument`] and
//! builds a complete page in a fresh [`Document`]. Every label is emitted in
//! both languages (`span.lang-ja` / `span.lang-en`); which one is visible is
//! decided by the `data-lang` attribute on `<body>`, so a language switch
//! never re-renders.
//!
//! The renderer only writes static classes. Derived presentation (highlight,
//! active list item, active language control) belongs to the session
//! controllers; the single exception is the initial expanded layer.

pub mod schema;
mod sections;

pub use schema::{
    BarSpec, BarsSpec, CardGridSpec, ColumnKind, ColumnSpec, DashboardSchema, DetailSpec,
    EntityListSpec, FeedPrefix, FeedSpec, GroupEntry, GroupSpec, LayerTreeSpec, SectionSpec,
    StatCard, StatsSpec, StatusDisplay, StatusSpec, TableSpec, Threshold,
};

use crate::dom::{Document, NodeId};
use crate::i18n::{Lang, LocalizationTable};
use crate::source::FetchError;
use crate::style::StylePresets;
use crate::types::{decode_tags, format_number, DataDocument, Entity};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Serialized tag-association set of a card.
pub const TAGS_ATTR: &str = "data-tags";
/// Id carried by a selectable list item.
pub const ENTITY_ATTR: &str = "data-entity-id";
/// Language a control switches to.
pub const LANG_OPTION_ATTR: &str = "data-lang-option";
/// Document-wide language attribute on `<body>`.
pub const LANG_ATTR: &str = "data-lang";
pub const LAYER_ATTR: &str = "data-layer";
pub const ERROR_CLASS: &str = "error-fragment";
pub const EXPANDED_CLASS: &str = "expanded";

const PAGE_CSS: &str = r#"
body[data-lang=ja] .lang-en, body[data-lang=en] .lang-ja { display: none; }
.tower-layer:not(.expanded) .layer-content { display: none; }
.tower-layer.expanded .expand-icon { transform: rotate(180deg); }
.selected-title:not(:empty)::before { content: " - "; }
.highlighted { border-color: #fbbf24; box-shadow: 0 0 0 3px rgba(251, 191, 36, 0.35); }
.highlight-pulse { animation: highlight-pulse 1.6s ease-in-out 2; }
@keyframes highlight-pulse { 50% { box-shadow: 0 0 0 6px rgba(251, 191, 36, 0.15); } }
"#;

/// A label in both languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bilingual {
    pub ja: String,
    pub en: String,
}

impl Bilingual {
    pub fn get(&self, lang: Lang) -> &str {
        match lang {
            Lang::Ja => &self.ja,
            Lang::En => &self.en,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Rendered,
    Failed,
}

/// A built page plus handles to every node the controllers derive state for.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub doc: Document,
    pub body: NodeId,
    pub main: NodeId,
    pub title_annotation: NodeId,
    pub lang_controls: Vec<(NodeId, Lang)>,
    pub selectables: Vec<(NodeId, String)>,
    pub clear_controls: Vec<NodeId>,
    pub cards: Vec<NodeId>,
    pub layers: Vec<(NodeId, String)>,
    pub status: PageStatus,
    names: BTreeMap<String, Bilingual>,
}

impl RenderedPage {
    /// Display name of a selectable entity.
    pub fn name(&self, id: &str) -> Option<&Bilingual> {
        self.names.get(id)
    }

    pub fn is_selectable(&self, id: &str) -> bool {
        self.names.contains_key(id)
    }

    pub fn selectable_ids(&self) -> impl Iterator<Item = &str> {
        self.selectables.iter().map(|(_, id)| id.as_str())
    }

    /// Tag set of a card, decoded from its attribute.
    pub fn card_tags(&self, card: NodeId) -> Vec<String> {
        self.doc
            .attr(card, TAGS_ATTR)
            .map(decode_tags)
            .unwrap_or_default()
    }

    pub fn error_fragments(&self) -> Vec<NodeId> {
        self.doc.find_by_class(self.main, ERROR_CLASS)
    }

    /// Cards and selectable list items reachable from the page root.
    pub fn entity_fragment_count(&self) -> usize {
        self.cards
            .iter()
            .chain(self.selectables.iter().map(|(node, _)| node))
            .filter(|node| self.doc.is_attached(**node))
            .count()
    }

    pub fn html(&self) -> String {
        format!("<!DOCTYPE html>\n{}\n", self.doc.to_html())
    }
}

/// Render `document` with `schema`. Never fails: absent fields are skipped,
/// missing strings render as key paths, unknown states use fallback styles.
pub fn render(
    schema: &DashboardSchema,
    document: &DataDocument,
    strings: &LocalizationTable,
    styles: &StylePresets,
) -> RenderedPage {
    let with_aside = schema.primary_list().is_some();
    let mut renderer = Renderer::new(schema, strings, styles, with_aside);

    for section in &schema.sections {
        match section {
            SectionSpec::EntityList(spec) => match renderer.aside {
                Some(aside) => renderer.entity_list(aside, spec, document),
                None => warn!(dashboard = %schema.name, "entity list without sidebar"),
            },
            SectionSpec::Stats(spec) => renderer.stats(spec, document),
            SectionSpec::Bars(spec) => renderer.bars(spec, document),
            SectionSpec::CardGrid(spec) => renderer.card_grid(spec, document),
            SectionSpec::Table(spec) => renderer.table(spec, document),
            SectionSpec::Feed(spec) => renderer.feed(spec, document),
            SectionSpec::LayerTree(spec) => renderer.layer_tree(spec, document),
        }
    }

    let page = renderer.finish(PageStatus::Rendered);
    debug!(
        dashboard = %schema.name,
        cards = page.cards.len(),
        selectables = page.selectables.len(),
        layers = page.layers.len(),
        "dashboard rendered"
    );
    page
}

/// Page whose main area holds exactly one localized error fragment.
pub fn render_error(
    schema: &DashboardSchema,
    strings: &LocalizationTable,
    styles: &StylePresets,
    error: &FetchError,
) -> RenderedPage {
    let mut renderer = Renderer::new(schema, strings, styles, false);
    let main = renderer.main;
    let fragment = renderer.doc.element_with(
        main,
        "div",
        "error-fragment bg-red-50 p-6 border border-red-200 rounded-lg text-center text-red-700 font-medium mt-8",
    );
    renderer.doc.set_attr(fragment, "role", "alert");

    let headline = renderer.doc.element(fragment, "p");
    renderer.label(headline, "error.load");

    let detail = renderer.doc.element_with(fragment, "p", "error-detail text-sm mt-2");
    let message = error.to_string();
    let ja = strings.format_with(Lang::Ja, "error.detail", &[("message", &message)]);
    let en = strings.format_with(Lang::En, "error.detail", &[("message", &message)]);
    renderer.bilingual(detail, &ja, &en);

    let candidates = error.candidates();
    if !candidates.is_empty() {
        let help = renderer.doc.element_with(fragment, "div", "mt-4 text-sm text-gray-600");
        let intro = renderer.doc.element(help, "p");
        renderer.label(intro, "error.candidates");
        let list = renderer.doc.element_with(help, "ul", "mt-2 text-left inline-block");
        for candidate in candidates {
            let item = renderer.doc.element(list, "li");
            renderer.doc.text(item, &format!("• {}", candidate));
        }
    }

    warn!(dashboard = %schema.name, error = %error, "rendered error fragment");
    renderer.finish(PageStatus::Failed)
}

/// Clamp a percentage to the drawable range.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Grid column token for a layer section with `count` items.
pub fn grid_columns(count: usize, compact: bool) -> &'static str {
    match (compact, count) {
        (false, n) if n <= 4 => "grid-cols-4",
        (false, _) => "grid-cols-5",
        (true, n) if n > 6 => "grid-cols-5",
        (true, _) => "grid-cols-4",
    }
}

struct Renderer<'a> {
    doc: Document,
    strings: &'a LocalizationTable,
    styles: &'a StylePresets,
    body: NodeId,
    main: NodeId,
    aside: Option<NodeId>,
    title_annotation: NodeId,
    lang_controls: Vec<(NodeId, Lang)>,
    selectables: Vec<(NodeId, String)>,
    clear_controls: Vec<NodeId>,
    cards: Vec<NodeId>,
    layers: Vec<(NodeId, String)>,
    names: BTreeMap<String, Bilingual>,
}

impl<'a> Renderer<'a> {
    fn new(
        schema: &DashboardSchema,
        strings: &'a LocalizationTable,
        styles: &'a StylePresets,
        with_aside: bool,
    ) -> Self {
        let default_lang = strings.default_lang();
        let mut doc = Document::new("html");
        let root = doc.root();
        doc.set_attr(root, "lang", default_lang.code());

        let head = doc.element(root, "head");
        let charset = doc.element(head, "meta");
        doc.set_attr(charset, "charset", "utf-8");
        let viewport = doc.element(head, "meta");
        doc.set_attr(viewport, "name", "viewport");
        doc.set_attr(viewport, "content", "width=device-width, initial-scale=1.0");
        let title = doc.element(head, "title");
        doc.text(title, strings.resolve(default_lang, &schema.title));
        let tailwind = doc.element(head, "script");
        doc.set_attr(tailwind, "src", "https://cdn.tailwindcss.com");
        let style = doc.element(head, "style");
        doc.text(style, PAGE_CSS);

        let body = doc.element_with(root, "body", "bg-gray-100 text-gray-800 min-h-screen");
        doc.set_attr(body, LANG_ATTR, default_lang.code());
        doc.set_attr(body, "data-dashboard", &schema.name);

        let wrapper = doc.element_with(body, "div", "max-w-7xl mx-auto p-5");
        let header = doc.element_with(
            wrapper,
            "header",
            "dashboard-header bg-white rounded-2xl shadow-sm p-6 mb-5 flex justify-between items-center",
        );
        let heading = doc.element_with(header, "h1", "page-title text-2xl font-bold text-gray-800");

        let mut renderer = Self {
            doc,
            strings,
            styles,
            body,
            main: body,
            aside: None,
            title_annotation: body,
            lang_controls: Vec::new(),
            selectables: Vec::new(),
            clear_controls: Vec::new(),
            cards: Vec::new(),
            layers: Vec::new(),
            names: BTreeMap::new(),
        };
        renderer.label(heading, &schema.title);
        renderer.title_annotation =
            renderer.doc.element_with(heading, "span", "selected-title text-indigo-600");

        let switch = renderer.doc.element_with(header, "div", "lang-switch flex gap-2");
        for lang in Lang::all() {
            let button = renderer.doc.element_with(
                switch,
                "button",
                "lang-btn px-4 py-2 rounded-lg text-sm font-medium cursor-pointer",
            );
            renderer.doc.set_attr(button, "type", "button");
            renderer.doc.set_attr(button, LANG_OPTION_ATTR, lang.code());
            renderer.doc.text(button, lang.control_label());
            renderer.lang_controls.push((button, *lang));
        }

        let layout = renderer.doc.element_with(wrapper, "div", "flex gap-5 items-start");
        if with_aside {
            renderer.aside = Some(renderer.doc.element_with(
                layout,
                "aside",
                "sidebar w-72 flex-shrink-0 bg-white rounded-2xl shadow-sm p-5",
            ));
        }
        renderer.main =
            renderer
                .doc
                .element_with(layout, "main", "flex-1 bg-white rounded-2xl shadow-sm p-6");
        renderer
    }

    fn finish(self, status: PageStatus) -> RenderedPage {
        RenderedPage {
            doc: self.doc,
            body: self.body,
            main: self.main,
            title_annotation: self.title_annotation,
            lang_controls: self.lang_controls,
            selectables: self.selectables,
            clear_controls: self.clear_controls,
            cards: self.cards,
            layers: self.layers,
            status,
            names: self.names,
        }
    }

    /// Emit both language variants under `parent`.
    fn bilingual(&mut self, parent: NodeId, ja: &str, en: &str) {
        for (lang, text) in [(Lang::Ja, ja), (Lang::En, en)] {
            let span = self.doc.element_with(parent, "span", lang.span_class());
            self.doc.text(span, text);
        }
    }

    /// Localized label for `key`.
    fn label(&mut self, parent: NodeId, key: &str) {
        let strings = self.strings;
        self.bilingual(
            parent,
            strings.resolve(Lang::Ja, key),
            strings.resolve(Lang::En, key),
        );
    }

    /// Template `key` expanded against `entity` in both languages.
    fn template(&mut self, parent: NodeId, key: &str, entity: Option<&Entity<'_>>) {
        let ja = self.strings.format(Lang::Ja, key, entity);
        let en = self.strings.format(Lang::En, key, entity);
        self.bilingual(parent, &ja, &en);
    }

    /// Bilingual entity field; returns `false` (and emits nothing) when the
    /// field is absent in both languages.
    fn field(&mut self, parent: NodeId, entity: &Entity<'_>, field: &str, suffix: &str) -> bool {
        match bilingual_field(entity, field) {
            Some(text) => {
                self.bilingual(
                    parent,
                    &format!("{}{}", text.ja, suffix),
                    &format!("{}{}", text.en, suffix),
                );
                true
            }
            None => false,
        }
    }

    /// Section heading; nothing for `None`.
    fn heading(&mut self, parent: NodeId, key: Option<&str>) {
        if let Some(key) = key {
            let heading = self.doc.element_with(
                parent,
                "h2",
                "section-heading text-lg font-semibold text-gray-800 mb-5 pb-2.5 border-b-2 border-gray-200",
            );
            self.label(heading, key);
        }
    }

    /// Localization lookup that falls back to `raw` instead of the key path.
    fn lookup_or(&self, lang: Lang, key: &str, raw: &str) -> String {
        self.strings
            .lookup(lang, key)
            .or_else(|| self.strings.lookup(self.strings.default_lang(), key))
            .unwrap_or(raw)
            .to_string()
    }

    /// Label `text` next to a bar whose width is the clamped value.
    fn progress_bar(&mut self, parent: NodeId, value: f64, label: &str, bar: &str) -> NodeId {
        let row = self.doc.element_with(parent, "div", "progress flex items-center gap-2");
        let caption = self.doc.element_with(row, "span", "progress-label text-xs");
        self.doc.text(caption, label);
        let track = self.doc.element_with(
            row,
            "div",
            "progress-track flex-1 h-2 bg-gray-200 rounded-full overflow-hidden",
        );
        let fill = self.doc.element_with(track, "div", "progress-fill h-full rounded-full");
        self.doc.add_class(fill, bar);
        self.doc
            .set_style(fill, &format!("width: {}%;", format_number(clamp_percent(value))));
        fill
    }
}

/// Field value in both languages, each falling back to the other.
fn bilingual_field(entity: &Entity<'_>, field: &str) -> Option<Bilingual> {
    let ja = entity.localized(field, Lang::Ja);
    let en = entity.localized(field, Lang::En);
    match (ja, en) {
        (None, None) => None,
        (ja, en) => {
            let ja_text = ja.clone().or_else(|| en.clone()).unwrap_or_default();
            let en_text = en.or(ja).unwrap_or_default();
            Some(Bilingual {
                ja: ja_text,
                en: en_text,
            })
        }
    }
}
