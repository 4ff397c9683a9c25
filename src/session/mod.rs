// SPDX-License-Identifier: PMPL-1.0-or-later

//! Dashboard session: one loaded dashboard and its interaction state.
//!
//! The session owns the schema, the configuration, the current data
//! document, the rendered page and the three controllers. Every interaction
//! is a method call; each one re-derives presentation on the existing page
//! rather than rendering again.

mod language;
mod layers;
mod script;
mod selection;

pub use language::{active_controls, LanguageController};
pub use layers::LayerController;
pub use script::{parse_script, ScriptCommand};
pub use selection::{
    active_items, highlighted_cards, SelectionController, SelectionState, ACTIVE_MARKER,
    HIGHLIGHT_MARKER,
};

use crate::config::Configuration;
use crate::dom::NodeId;
use crate::i18n::Lang;
use crate::render::{render, render_error, DashboardSchema, PageStatus, RenderedPage};
use crate::source::{load_document, Fetch, FetchError};
use crate::storage::PreferenceStore;
use crate::types::DataDocument;
use serde::Serialize;
use tracing::{info, warn};

/// Snapshot of a session for reports.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub dashboard: String,
    pub loaded: bool,
    pub source: Option<String>,
    pub language: Lang,
    pub selection: SelectionState,
    pub title_annotation: String,
    pub cards: usize,
    pub highlighted: usize,
    pub selectables: Vec<String>,
    pub expanded_layers: Vec<String>,
    pub error_fragments: usize,
}

pub struct DashboardSession<S: PreferenceStore> {
    schema: DashboardSchema,
    config: Configuration,
    document: Option<DataDocument>,
    source: Option<String>,
    page: RenderedPage,
    selection: SelectionController,
    language: LanguageController<S>,
    layers: LayerController,
}

impl<S: PreferenceStore> DashboardSession<S> {
    /// A session showing the schema's empty shell until a document arrives.
    pub fn new(schema: DashboardSchema, config: Configuration, store: S) -> Self {
        let page = render(
            &schema,
            &DataDocument::default(),
            &config.localization,
            &config.styles,
        );
        let language = LanguageController::new(store, config.default_lang);
        let layers = LayerController::from_page(&page);
        let mut session = Self {
            schema,
            config,
            document: None,
            source: None,
            page,
            selection: SelectionController::new(),
            language,
            layers,
        };
        session.rederive();
        session
    }

    /// Data locations to try: configured candidates win over the schema's.
    pub fn candidates(&self) -> Vec<String> {
        if self.config.data_candidates.is_empty() {
            self.schema.candidates()
        } else {
            self.config.data_candidates.clone()
        }
    }

    /// Fetch the data document and render it. On failure the page is
    /// replaced by a single error fragment and the error is returned.
    pub async fn load<F: Fetch + ?Sized>(&mut self, fetcher: &F) -> Result<(), FetchError> {
        let candidates = self.candidates();
        match load_document(fetcher, &candidates).await {
            Ok((location, document)) => {
                info!(dashboard = %self.schema.name, location = %location, "data document loaded");
                self.install_document(document, Some(location));
                Ok(())
            }
            Err(err) => {
                warn!(dashboard = %self.schema.name, error = %err, "data load failed");
                self.document = None;
                self.source = None;
                self.selection.reset();
                self.page = render_error(
                    &self.schema,
                    &self.config.localization,
                    &self.config.styles,
                    &err,
                );
                self.layers = LayerController::from_page(&self.page);
                self.rederive();
                Err(err)
            }
        }
    }

    /// Replace the document wholesale and re-render. Clears the selection.
    pub fn install_document(&mut self, document: DataDocument, source: Option<String>) {
        self.page = render(
            &self.schema,
            &document,
            &self.config.localization,
            &self.config.styles,
        );
        self.document = Some(document);
        self.source = source;
        self.selection.reset();
        self.layers = LayerController::from_page(&self.page);
        self.rederive();
    }

    fn rederive(&mut self) {
        let styles = &self.config.styles;
        self.language.apply(&mut self.page, styles, None);
        self.selection.apply(&mut self.page, styles, self.language.lang());
        self.layers.apply(&mut self.page);
    }

    pub fn select(&mut self, id: &str) -> usize {
        if self.is_clear_id(id) {
            return self.clear();
        }
        let lang = self.language.lang();
        self.selection.select(&mut self.page, &self.config.styles, lang, id)
    }

    pub fn clear(&mut self) -> usize {
        let lang = self.language.lang();
        self.selection.clear(&mut self.page, &self.config.styles, lang)
    }

    fn is_clear_id(&self, id: &str) -> bool {
        self.schema
            .primary_list()
            .and_then(|list| list.clear_item.as_deref())
            == Some(id)
    }

    pub fn set_language(&mut self, lang: Lang, origin: Option<NodeId>) {
        self.language
            .set_language(&mut self.page, &self.config.styles, lang, origin);
        // the title annotation follows the active language
        self.selection
            .apply(&mut self.page, &self.config.styles, lang);
    }

    pub fn load_preference(&mut self) -> Lang {
        let lang = self
            .language
            .load_preference(&mut self.page, &self.config.styles);
        self.selection
            .apply(&mut self.page, &self.config.styles, lang);
        lang
    }

    pub fn toggle_layer(&mut self, id: &str) -> Option<bool> {
        self.layers.toggle(&mut self.page, id)
    }

    /// Dispatch a click on `node`: a language control, a selectable item,
    /// a clear control or a layer. Returns `false` for inert nodes.
    pub fn click(&mut self, node: NodeId) -> bool {
        if let Some((_, lang)) = self.page.lang_controls.iter().find(|(n, _)| *n == node) {
            let lang = *lang;
            self.set_language(lang, Some(node));
            return true;
        }
        if let Some((_, id)) = self.page.selectables.iter().find(|(n, _)| *n == node) {
            let id = id.clone();
            self.select(&id);
            return true;
        }
        if self.page.clear_controls.contains(&node) {
            self.clear();
            return true;
        }
        if let Some((_, id)) = self.page.layers.iter().find(|(n, _)| *n == node) {
            let id = id.clone();
            return self.toggle_layer(&id).is_some();
        }
        false
    }

    pub fn schema(&self) -> &DashboardSchema {
        &self.schema
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn document(&self) -> Option<&DataDocument> {
        self.document.as_ref()
    }

    pub fn page(&self) -> &RenderedPage {
        &self.page
    }

    pub fn lang(&self) -> Lang {
        self.language.lang()
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn layers(&self) -> &LayerController {
        &self.layers
    }

    pub fn store(&self) -> &S {
        self.language.store()
    }

    pub fn highlighted(&self) -> Vec<NodeId> {
        highlighted_cards(&self.page)
    }

    pub fn highlighted_count(&self) -> usize {
        self.highlighted().len()
    }

    pub fn title_annotation(&self) -> String {
        self.page.doc.text_content(self.page.title_annotation)
    }

    pub fn html(&self) -> String {
        self.page.html()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            dashboard: self.schema.name.clone(),
            loaded: self.page.status == PageStatus::Rendered && self.document.is_some(),
            source: self.source.clone(),
            language: self.lang(),
            selection: self.selection().clone(),
            title_annotation: self.title_annotation(),
            cards: self.page.cards.len(),
            highlighted: self.highlighted_count(),
            selectables: self.page.selectable_ids().map(str::to_string).collect(),
            expanded_layers: self.layers.expanded().map(str::to_string).collect(),
            error_fragments: self.page.error_fragments().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, LANGUAGE_KEY};
    use serde_json::json;

    fn session_with(value: serde_json::Value) -> DashboardSession<MemoryStore> {
        let schema = DashboardSchema::bundled("application-layer").unwrap();
        let mut session = DashboardSession::new(schema, Configuration::builtin(), MemoryStore::new());
        session.install_document(DataDocument::from_value(value).unwrap(), None);
        session
    }

    fn sample() -> serde_json::Value {
        json!({
            "projects": [
                {"id": "p1", "nameJA": "アルファ", "nameEN": "Alpha", "progress": 40},
                {"id": "p2", "nameJA": "ベータ", "nameEN": "Beta", "progress": 10}
            ],
            "applications": [
                {"id": "a1", "nameJA": "受注", "nameEN": "Orders", "projects": ["p1"], "tags": []},
                {"id": "a2", "nameJA": "会計", "nameEN": "Ledger", "projects": ["p2"], "tags": []},
                {"id": "a3", "nameJA": "共通", "nameEN": "Shared", "projects": ["p1", "p2"], "tags": []}
            ]
        })
    }

    #[test]
    fn select_then_clear() {
        let mut session = session_with(sample());
        assert_eq!(session.select("p1"), 2);
        assert_eq!(session.selection(), &SelectionState::Selected("p1".into()));
        assert_eq!(session.title_annotation(), "アルファ");
        assert_eq!(active_items(session.page()).len(), 1);

        assert_eq!(session.clear(), 0);
        assert_eq!(session.highlighted_count(), 0);
        assert_eq!(session.title_annotation(), "");
        assert!(active_items(session.page()).is_empty());
    }

    #[test]
    fn reselect_is_idempotent() {
        let mut session = session_with(sample());
        session.select("p2");
        let before = session.html();
        session.select("p2");
        assert_eq!(session.html(), before);
    }

    #[test]
    fn unknown_id_leaves_unselected() {
        let mut session = session_with(sample());
        session.select("p1");
        assert_eq!(session.select("zz"), 0);
        assert_eq!(session.selection(), &SelectionState::Unselected);
        assert_eq!(session.title_annotation(), "");
    }

    #[test]
    fn language_switch_rederives_title() {
        let mut session = session_with(sample());
        session.select("p1");
        session.set_language(Lang::En, None);
        assert_eq!(session.title_annotation(), "Alpha");
        assert_eq!(session.store().get(LANGUAGE_KEY).as_deref(), Some("en"));
        assert_eq!(active_controls(session.page()).len(), 1);
    }

    #[test]
    fn reload_clears_selection() {
        let mut session = session_with(sample());
        session.select("p1");
        session.install_document(DataDocument::from_value(sample()).unwrap(), None);
        assert_eq!(session.selection(), &SelectionState::Unselected);
        assert_eq!(session.highlighted_count(), 0);
    }

    #[test]
    fn click_dispatches_by_node() {
        let mut session = session_with(sample());
        let (item, _) = session.page().selectables[1].clone();
        assert!(session.click(item));
        assert_eq!(session.selection(), &SelectionState::Selected("p2".into()));

        let (english, _) = session.page().lang_controls[1];
        assert!(session.click(english));
        assert_eq!(session.lang(), Lang::En);

        let clear = session.page().clear_controls[0];
        assert!(session.click(clear));
        assert_eq!(session.selection(), &SelectionState::Unselected);

        let body = session.page().body;
        assert!(!session.click(body));
    }
}
