// SPDX-License-Identifier: PMPL-1.0-or-later

//! Selection controller: which primary entity, if any, is highlighted.

use crate::dom::NodeId;
use crate::i18n::Lang;
use crate::render::RenderedPage;
use crate::style::{category, StylePresets};
use serde::Serialize;
use tracing::debug;

/// Marker kept on highlighted cards regardless of configured tokens.
pub const HIGHLIGHT_MARKER: &str = "highlighted";
/// Marker kept on the active list item and language control.
pub const ACTIVE_MARKER: &str = "active";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "lowercase")]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(String),
}

impl SelectionState {
    pub fn id(&self) -> Option<&str> {
        match self {
            SelectionState::Unselected => None,
            SelectionState::Selected(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Select `id` and re-derive highlights. Ids that are not selectable on
    /// the page leave the controller unselected. Returns the highlight count.
    pub fn select(&mut self, page: &mut RenderedPage, styles: &StylePresets, lang: Lang, id: &str) -> usize {
        if page.is_selectable(id) {
            self.state = SelectionState::Selected(id.to_string());
        } else {
            debug!(id, "selection ignored: id not in primary list");
            self.state = SelectionState::Unselected;
        }
        self.apply(page, styles, lang)
    }

    pub fn clear(&mut self, page: &mut RenderedPage, styles: &StylePresets, lang: Lang) -> usize {
        self.state = SelectionState::Unselected;
        self.apply(page, styles, lang)
    }

    /// Forget the selection without touching any page (document reload).
    pub fn reset(&mut self) {
        self.state = SelectionState::Unselected;
    }

    /// Wipe every selection-derived class and recompute from the current
    /// state. Returns the number of highlighted cards.
    pub fn apply(&self, page: &mut RenderedPage, styles: &StylePresets, lang: Lang) -> usize {
        let highlight = styles.resolve(category::SELECTION, "highlighted").classes();
        let active = styles.resolve(category::SELECTION, "active").classes();

        for card in &page.cards {
            page.doc.clear_state_classes(*card);
        }
        for (item, _) in &page.selectables {
            page.doc.clear_state_classes(*item);
        }
        page.doc.set_text(page.title_annotation, "");

        let Some(id) = self.state.id() else {
            return 0;
        };

        let matching: Vec<NodeId> = page
            .cards
            .iter()
            .copied()
            .filter(|card| page.card_tags(*card).iter().any(|tag| tag == id))
            .collect();
        for card in &matching {
            page.doc.add_state_class(*card, HIGHLIGHT_MARKER);
            page.doc.add_state_class(*card, &highlight);
        }

        for (item, item_id) in &page.selectables {
            if item_id == id {
                page.doc.add_state_class(*item, ACTIVE_MARKER);
                page.doc.add_state_class(*item, &active);
            }
        }

        let title = page.name(id).map(|name| name.get(lang).to_string()).unwrap_or_default();
        page.doc.set_text(page.title_annotation, &title);
        matching.len()
    }
}

/// Cards currently carrying the highlight marker.
pub fn highlighted_cards(page: &RenderedPage) -> Vec<NodeId> {
    page.cards
        .iter()
        .copied()
        .filter(|card| page.doc.has_state_class(*card, HIGHLIGHT_MARKER))
        .collect()
}

/// Selectable list items currently marked active.
pub fn active_items(page: &RenderedPage) -> Vec<NodeId> {
    page.selectables
        .iter()
        .map(|(item, _)| *item)
        .filter(|item| page.doc.has_state_class(*item, ACTIVE_MARKER))
        .collect()
}
