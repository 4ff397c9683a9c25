// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported pages

use crate::dom::TreeNode;
use crate::render::RenderedPage;
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Html,
    Json,
    Yaml,
}

/// Structured projection of a page for the JSON/YAML outputs.
#[derive(Debug, Serialize)]
struct PageExport<'a> {
    dashboard: &'a str,
    language: &'a str,
    tree: TreeNode,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(OutputFormat::Html),
            "json" => Some(OutputFormat::Json),
            "yaml" | "yml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    pub fn serialize(&self, page: &RenderedPage) -> Result<String> {
        if *self == OutputFormat::Html {
            return Ok(page.html());
        }
        let export = PageExport {
            dashboard: page.doc.attr(page.body, "data-dashboard").unwrap_or_default(),
            language: page.doc.attr(page.body, crate::render::LANG_ATTR).unwrap_or_default(),
            tree: page.doc.tree(page.doc.root()),
        };
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&export)?),
            _ => Ok(serde_yaml::to_string(&export)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::render::{render, DashboardSchema};
    use crate::types::DataDocument;

    fn page() -> RenderedPage {
        let config = Configuration::builtin();
        let schema = DashboardSchema::bundled("tbm-tower").unwrap();
        render(&schema, &DataDocument::default(), &config.localization, &config.styles)
    }

    #[test]
    fn parses_aliases() {
        assert_eq!(OutputFormat::parse("YML"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::parse("htm"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::parse("csv"), None);
    }

    #[test]
    fn html_has_doctype() {
        let html = OutputFormat::Html.serialize(&page()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn json_export_carries_dashboard_name() {
        let json = OutputFormat::Json.serialize(&page()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["dashboard"], "tbm-tower");
        assert_eq!(value["tree"]["tag"], "html");
    }
}
