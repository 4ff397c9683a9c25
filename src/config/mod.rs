// SPDX-License-Identifier: PMPL-1.0-or-later

//! Load-once dashboard configuration.
//!
//! ```yaml
//! default-language: ja
//! default-style: { background: bg-gray-100, text: text-gray-800 }
//! styles:
//!   eol:
//!     default: unknown
//!     states:
//!       critical: { background: bg-red-500 }
//! localization:
//!   ja: { app: { title: アプリ一覧 } }
//!   en: { app: { title: Applications } }
//! data-candidates: [./data.json, ../data/data.json]
//! ```
//!
//! Every section is optional. Configured styles and strings overlay the
//! built-in presets and catalog.

use crate::i18n::{Lang, LocalizationTable};
use crate::source::{fetch_first, Fetch};
use crate::style::{PresetCategory, StylePresets, TokenBundle};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct ConfigFile {
    default_language: Option<Lang>,
    default_style: Option<TokenBundle>,
    styles: BTreeMap<String, PresetCategory>,
    localization: Option<serde_yaml::Value>,
    data_candidates: Vec<String>,
}

/// Process-wide configuration: written once before the first render.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub default_lang: Lang,
    pub localization: LocalizationTable,
    pub styles: StylePresets,
    /// Data locations that replace a dashboard's own candidate list.
    pub data_candidates: Vec<String>,
}

impl Configuration {
    /// Degraded mode: hard-coded literal text and style tokens.
    pub fn builtin() -> Self {
        let default_lang = Lang::default();
        Self {
            default_lang,
            localization: LocalizationTable::builtin(default_lang),
            styles: StylePresets::builtin(),
            data_candidates: Vec::new(),
        }
    }

    /// Configuration used after a failed configuration load: built-in styles
    /// and an empty localization table, so labels render as raw key paths.
    pub fn unlocalized() -> Self {
        let default_lang = Lang::default();
        Self {
            localization: LocalizationTable::empty(default_lang),
            ..Self::builtin()
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(raw).context("parsing configuration")?;
        let default_lang = file.default_language.unwrap_or_default();

        let mut localization = LocalizationTable::builtin(default_lang);
        if let Some(tree) = &file.localization {
            localization
                .merge_yaml(tree)
                .context("reading configuration localization")?;
        }

        let mut styles = StylePresets::builtin();
        if let Some(fallback) = file.default_style {
            styles.set_fallback(fallback);
        }
        styles.overlay(&file.styles);

        debug!(
            default_lang = %default_lang,
            style_categories = file.styles.len(),
            candidates = file.data_candidates.len(),
            "configuration parsed"
        );

        Ok(Self {
            default_lang,
            localization,
            styles,
            data_candidates: file.data_candidates,
        })
    }

    /// Fetch and parse the configuration document at `location`.
    pub async fn load<F: Fetch + ?Sized>(fetcher: &F, location: &str) -> Result<Self> {
        let located = fetch_first(fetcher, &[location.to_string()])
            .await
            .with_context(|| format!("loading configuration from {}", location))?;
        info!(location = %located.location, "configuration loaded");
        Self::from_yaml(&located.body)
            .with_context(|| format!("invalid configuration at {}", located.location))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::category;

    #[test]
    fn empty_document_matches_builtin() {
        let config = Configuration::from_yaml("{}").unwrap();
        assert_eq!(config.default_lang, Lang::Ja);
        assert_eq!(config.styles, StylePresets::builtin());
        assert_eq!(
            config.localization.resolve(Lang::En, "app.title"),
            "Application Layer Overview"
        );
    }

    #[test]
    fn overlays_styles_and_strings() {
        let raw = r#"
default-language: en
default-style:
  background: bg-slate-50
styles:
  eol:
    states:
      critical: { background: bg-rose-700 }
localization:
  en:
    app:
      title: Apps
data-candidates:
  - ./custom.json
"#;
        let config = Configuration::from_yaml(raw).unwrap();
        assert_eq!(config.default_lang, Lang::En);
        assert_eq!(config.styles.resolve(category::EOL, "critical").background, "bg-rose-700");
        assert_eq!(config.styles.resolve("nope", "x").background, "bg-slate-50");
        assert_eq!(config.localization.resolve(Lang::En, "app.title"), "Apps");
        assert_eq!(config.data_candidates, vec!["./custom.json"]);
    }

    #[test]
    fn invalid_language_is_an_error() {
        assert!(Configuration::from_yaml("default-language: fr").is_err());
        assert!(Configuration::from_yaml("localization:\n  de:\n    a: b\n").is_err());
    }

    #[test]
    fn unlocalized_renders_raw_keys() {
        let config = Configuration::unlocalized();
        assert_eq!(config.localization.resolve(Lang::Ja, "app.title"), "app.title");
    }
}
