// SPDX-License-Identifier: PMPL-1.0-or-later

//! Collapsible layer state for layer-tree sections.

use crate::render::{RenderedPage, EXPANDED_CLASS};
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct LayerController {
    expanded: BTreeSet<String>,
}

impl LayerController {
    /// Adopt the expansion state the page was rendered with.
    pub fn from_page(page: &RenderedPage) -> Self {
        let expanded = page
            .layers
            .iter()
            .filter(|(node, _)| page.doc.has_state_class(*node, EXPANDED_CLASS))
            .map(|(_, id)| id.clone())
            .collect();
        Self { expanded }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }

    /// Flip one layer. Returns the new state, or `None` for an unknown layer.
    pub fn toggle(&mut self, page: &mut RenderedPage, id: &str) -> Option<bool> {
        if !page.layers.iter().any(|(_, layer)| layer == id) {
            debug!(id, "toggle ignored: no such layer");
            return None;
        }
        let now_expanded = if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.to_string());
            true
        };
        self.apply(page);
        Some(now_expanded)
    }

    pub fn apply(&self, page: &mut RenderedPage) {
        for (node, id) in &page.layers {
            page.doc.clear_state_classes(*node);
            if self.expanded.contains(id) {
                page.doc.add_state_class(*node, EXPANDED_CLASS);
            }
        }
    }
}
