// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language controller: document language, active control, persistence.

use super::selection::ACTIVE_MARKER;
use crate::dom::{Document, NodeId};
use crate::i18n::Lang;
use crate::render::{RenderedPage, LANG_ATTR, LANG_OPTION_ATTR};
use crate::storage::{PreferenceStore, LANGUAGE_KEY};
use crate::style::{category, StylePresets};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct LanguageController<S: PreferenceStore> {
    lang: Lang,
    default_lang: Lang,
    store: S,
}

impl<S: PreferenceStore> LanguageController<S> {
    pub fn new(store: S, default_lang: Lang) -> Self {
        Self {
            lang: default_lang,
            default_lang,
            store,
        }
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Switch to `lang`. `origin` is the control that triggered the switch,
    /// if any; otherwise the control matching `lang` becomes active.
    pub fn set_language(
        &mut self,
        page: &mut RenderedPage,
        styles: &StylePresets,
        lang: Lang,
        origin: Option<NodeId>,
    ) {
        self.lang = lang;
        self.apply(page, styles, origin);
        if let Err(err) = self.store.set(LANGUAGE_KEY, lang.code()) {
            warn!(error = %err, "could not persist language preference");
        }
        debug!(lang = %lang, "language set");
    }

    /// Read the persisted preference (else the configured default) and apply it.
    pub fn load_preference(&mut self, page: &mut RenderedPage, styles: &StylePresets) -> Lang {
        let stored = self.store.get(LANGUAGE_KEY);
        let lang = match stored.as_deref().map(Lang::from_code) {
            Some(Some(lang)) => lang,
            Some(None) => {
                warn!(value = ?stored, "ignoring unsupported stored language");
                self.default_lang
            }
            None => self.default_lang,
        };
        self.set_language(page, styles, lang, None);
        lang
    }

    /// Re-derive `data-lang` and the control states from the current language.
    pub fn apply(&self, page: &mut RenderedPage, styles: &StylePresets, origin: Option<NodeId>) {
        let code = self.lang.code();
        page.doc.set_attr(page.body, LANG_ATTR, code);

        let controls: Vec<NodeId> = page.lang_controls.iter().map(|(node, _)| *node).collect();
        let target = origin
            .filter(|node| controls.contains(node) && control_matches(&page.doc, *node, self.lang))
            .or_else(|| {
                controls
                    .iter()
                    .copied()
                    .find(|node| control_matches(&page.doc, *node, self.lang))
            });

        let active = styles.resolve(category::LANG_BUTTON, "active").classes();
        let inactive = styles.resolve(category::LANG_BUTTON, "inactive").classes();
        for node in controls {
            page.doc.clear_state_classes(node);
            if Some(node) == target {
                page.doc.add_state_class(node, ACTIVE_MARKER);
                page.doc.add_state_class(node, &active);
            } else {
                page.doc.add_state_class(node, &inactive);
            }
        }
    }
}

/// A control matches by its `data-lang-option`, else by its visible label.
fn control_matches(doc: &Document, node: NodeId, lang: Lang) -> bool {
    match doc.attr(node, LANG_OPTION_ATTR).map(Lang::from_code) {
        Some(option) => option == Some(lang),
        None => doc.text_content(node).contains(lang.control_label()),
    }
}

/// Language controls currently marked active.
pub fn active_controls(page: &RenderedPage) -> Vec<NodeId> {
    page.lang_controls
        .iter()
        .map(|(node, _)| *node)
        .filter(|node| page.doc.has_state_class(*node, ACTIVE_MARKER))
        .collect()
}
