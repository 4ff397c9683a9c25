// SPDX-License-Identifier: PMPL-1.0-or-later

//! Style preset resolution.
//!
//! Maps a semantic state within a category (project status, risk level, EOL
//! severity, resource load, ...) to a bundle of opaque style tokens. Upstream
//! data is never schema-validated, so an unmatched state is not an error: it
//! resolves to the category's designated default, then to its `unknown`
//! entry, then to the global fallback bundle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known categories used by the bundled dashboards.
pub mod category {
    pub const PROJECT_STATUS: &str = "project-status";
    pub const PORTFOLIO_STATUS: &str = "portfolio-status";
    pub const RESOURCE_LOAD: &str = "resource-load";
    pub const RISK_LEVEL: &str = "risk-level";
    pub const EOL: &str = "eol";
    pub const UTILIZATION: &str = "utilization";
    pub const BAR: &str = "bar";
    pub const LAYER: &str = "layer";
    pub const LANG_BUTTON: &str = "lang-button";
    pub const SELECTION: &str = "selection";
}

/// Opaque presentation tokens. Any slot may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenBundle {
    pub background: String,
    pub text: String,
    pub border: String,
    pub bar: String,
    pub extra: String,
}

impl TokenBundle {
    pub fn new(background: &str, text: &str, border: &str, bar: &str) -> Self {
        Self {
            background: background.to_string(),
            text: text.to_string(),
            border: border.to_string(),
            bar: bar.to_string(),
            extra: String::new(),
        }
    }

    pub fn with_extra(mut self, extra: &str) -> Self {
        self.extra = extra.to_string();
        self
    }

    /// Non-empty tokens in slot order, space-joined.
    pub fn classes(&self) -> String {
        [&self.background, &self.text, &self.border, &self.bar, &self.extra]
            .iter()
            .filter(|token| !token.is_empty())
            .map(|token| token.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Background and text tokens only (badges, chips).
    pub fn badge_classes(&self) -> String {
        [&self.background, &self.text, &self.border]
            .iter()
            .filter(|token| !token.is_empty())
            .map(|token| token.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// States of one category plus an optional designated default state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetCategory {
    pub default: Option<String>,
    pub states: BTreeMap<String, TokenBundle>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePresets {
    categories: BTreeMap<String, PresetCategory>,
    fallback: TokenBundle,
}

impl StylePresets {
    pub fn new(fallback: TokenBundle) -> Self {
        Self {
            categories: BTreeMap::new(),
            fallback,
        }
    }

    pub fn fallback(&self) -> &TokenBundle {
        &self.fallback
    }

    pub fn set_fallback(&mut self, fallback: TokenBundle) {
        self.fallback = fallback;
    }

    pub fn insert(&mut self, category: &str, state: &str, bundle: TokenBundle) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .states
            .insert(state.to_string(), bundle);
    }

    pub fn set_default(&mut self, category: &str, state: &str) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .default = Some(state.to_string());
    }

    /// Overlay configured categories state by state.
    pub fn overlay(&mut self, categories: &BTreeMap<String, PresetCategory>) {
        for (name, incoming) in categories {
            let target = self.categories.entry(name.clone()).or_default();
            if incoming.default.is_some() {
                target.default = incoming.default.clone();
            }
            for (state, bundle) in &incoming.states {
                target.states.insert(state.clone(), bundle.clone());
            }
        }
    }

    pub fn contains(&self, category: &str, state: &str) -> bool {
        self.categories
            .get(category)
            .map(|c| c.states.contains_key(state))
            .unwrap_or(false)
    }

    /// Resolve a state to its token bundle. Never fails.
    pub fn resolve(&self, category: &str, state: &str) -> &TokenBundle {
        let Some(presets) = self.categories.get(category) else {
            return &self.fallback;
        };
        presets
            .states
            .get(state)
            .or_else(|| {
                presets
                    .default
                    .as_ref()
                    .and_then(|default| presets.states.get(default))
            })
            .or_else(|| presets.states.get("unknown"))
            .unwrap_or(&self.fallback)
    }

    /// Presets for every category the bundled dashboards use.
    pub fn builtin() -> Self {
        use category::*;

        let mut presets = Self::new(TokenBundle::new(
            "bg-gray-100",
            "text-gray-800",
            "border-gray-300",
            "bg-gray-400",
        ));

        presets.insert(PROJECT_STATUS, "on-track", TokenBundle::new("bg-green-100", "text-green-800", "border-green-300", "from-green-400 to-green-600"));
        presets.insert(PROJECT_STATUS, "at-risk", TokenBundle::new("bg-yellow-100", "text-yellow-800", "border-yellow-300", "from-yellow-400 to-yellow-600"));
        presets.insert(PROJECT_STATUS, "delayed", TokenBundle::new("bg-red-100", "text-red-800", "border-red-300", "from-red-400 to-red-600"));
        presets.insert(PROJECT_STATUS, "completed", TokenBundle::new("bg-blue-100", "text-blue-800", "border-blue-300", "from-blue-400 to-blue-600"));
        presets.insert(PROJECT_STATUS, "planning", TokenBundle::new("bg-gray-100", "text-gray-800", "border-gray-300", "from-gray-400 to-gray-600"));
        presets.set_default(PROJECT_STATUS, "planning");

        presets.insert(PORTFOLIO_STATUS, "onTrack", TokenBundle::new("bg-green-100", "text-green-800", "", "bg-green-500"));
        presets.insert(PORTFOLIO_STATUS, "caution", TokenBundle::new("bg-amber-100", "text-amber-800", "", "bg-amber-500"));
        presets.insert(PORTFOLIO_STATUS, "delayed", TokenBundle::new("bg-red-100", "text-red-800", "", "bg-red-500"));

        presets.insert(RESOURCE_LOAD, "overload", TokenBundle::new("bg-red-100", "text-red-800", "", "bg-red-500"));
        presets.insert(RESOURCE_LOAD, "high", TokenBundle::new("bg-amber-100", "text-amber-800", "", "bg-amber-500"));
        presets.insert(RESOURCE_LOAD, "optimal", TokenBundle::new("bg-green-100", "text-green-800", "", "bg-green-500"));
        presets.insert(RESOURCE_LOAD, "available", TokenBundle::new("bg-green-100", "text-green-800", "", "bg-green-500"));

        presets.insert(UTILIZATION, "high", TokenBundle::new("", "", "", "bg-red-500"));
        presets.insert(UTILIZATION, "elevated", TokenBundle::new("", "", "", "bg-amber-500"));
        presets.insert(UTILIZATION, "normal", TokenBundle::new("", "", "", "bg-green-500"));
        presets.set_default(UTILIZATION, "normal");

        presets.insert(RISK_LEVEL, "high", TokenBundle::new("", "", "border-red-500", ""));
        presets.insert(RISK_LEVEL, "medium", TokenBundle::new("", "", "border-amber-500", ""));
        presets.insert(RISK_LEVEL, "low", TokenBundle::new("", "", "border-green-500", ""));
        presets.insert(RISK_LEVEL, "unknown", TokenBundle::new("", "", "border-gray-500", ""));

        presets.insert(EOL, "critical", TokenBundle::new("bg-red-500", "", "", ""));
        presets.insert(EOL, "warning", TokenBundle::new("bg-amber-500", "", "", ""));
        presets.insert(EOL, "safe", TokenBundle::new("bg-green-500", "", "", ""));
        presets.insert(EOL, "unknown", TokenBundle::new("bg-gray-400", "", "", ""));

        presets.insert(BAR, "blue", TokenBundle::new("", "", "border-blue-500", "bg-blue-500"));
        presets.insert(BAR, "green", TokenBundle::new("", "", "border-green-500", "bg-green-500"));
        presets.insert(BAR, "amber", TokenBundle::new("", "", "border-amber-500", "bg-amber-500"));
        presets.insert(BAR, "indigo", TokenBundle::new("", "", "border-indigo-500", "bg-indigo-500"));
        presets.insert(BAR, "red", TokenBundle::new("", "", "border-red-500", "bg-red-500"));
        presets.set_default(BAR, "blue");

        presets.insert(LAYER, "solution", TokenBundle::new("from-purple-50 to-indigo-50", "", "border-purple-500", "from-purple-600 to-indigo-600"));
        presets.insert(LAYER, "tower", TokenBundle::new("from-blue-50 to-cyan-50", "", "border-blue-500", "from-blue-600 to-cyan-600"));
        presets.insert(LAYER, "costpool", TokenBundle::new("from-green-50 to-emerald-50", "", "border-green-500", "from-green-600 to-emerald-600"));
        presets.set_default(LAYER, "solution");

        presets.insert(LANG_BUTTON, "active", TokenBundle::new("bg-gradient-to-br from-indigo-500 to-purple-600", "text-white", "", "").with_extra("active"));
        presets.insert(LANG_BUTTON, "inactive", TokenBundle::new("bg-gray-100", "text-gray-500", "", ""));

        presets.insert(SELECTION, "highlighted", TokenBundle::default().with_extra("highlighted highlight-pulse"));
        presets.insert(SELECTION, "active", TokenBundle::new("bg-gradient-to-br from-indigo-100 to-purple-100", "", "border-l-indigo-500", "").with_extra("active font-semibold"));

        presets
    }
}

impl Default for StylePresets {
    fn default() -> Self {
        Self::builtin()
    }
}
