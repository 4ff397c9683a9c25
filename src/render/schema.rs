// SPDX-License-Identifier: PMPL-1.0-or-later

//! Dashboard schema descriptors.
//!
//! A schema tells the generic renderer which document sections to read and
//! how to lay them out. Labels are localization keys; field names refer to
//! entity fields, where a bilingual field `name` is read as `nameJA` /
//! `nameEN` with the bare `name` as fallback.

use crate::source::default_candidates;
use crate::style::category;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schemas compiled into the binary, keyed by dashboard name.
const BUNDLED: &[(&str, &str)] = &[
    ("application-layer", include_str!("../../dashboards/application-layer.yaml")),
    ("data-layer", include_str!("../../dashboards/data-layer.yaml")),
    ("it-portfolio", include_str!("../../dashboards/it-portfolio.yaml")),
    ("project-view", include_str!("../../dashboards/project-view.yaml")),
    ("tbm-tower", include_str!("../../dashboards/tbm-tower.yaml")),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DashboardSchema {
    pub name: String,
    /// Localization key of the page title.
    pub title: String,
    /// File name of the data document.
    pub data_file: String,
    /// Explicit fetch candidates; empty means the standard four locations.
    #[serde(default)]
    pub candidates: Vec<String>,
    pub sections: Vec<SectionSpec>,
}

impl DashboardSchema {
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let schema: Self = serde_yaml::from_str(raw).context("parsing dashboard schema")?;
        Ok(schema)
    }

    pub fn bundled(name: &str) -> Result<Self> {
        let (_, raw) = BUNDLED
            .iter()
            .find(|(bundled, _)| *bundled == name)
            .ok_or_else(|| anyhow!("unknown dashboard '{}'", name))?;
        Self::from_yaml(raw).with_context(|| format!("bundled dashboard '{}'", name))
    }

    pub fn bundled_names() -> impl Iterator<Item = &'static str> {
        BUNDLED.iter().map(|(name, _)| *name)
    }

    /// A bundled dashboard name, or a path to a schema file.
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if Self::bundled_names().any(|name| name == name_or_path) {
            return Self::bundled(name_or_path);
        }
        let path = Path::new(name_or_path);
        if !path.exists() {
            return Err(anyhow!(
                "'{}' is neither a bundled dashboard ({}) nor a schema file",
                name_or_path,
                Self::bundled_names().collect::<Vec<_>>().join(", ")
            ));
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading schema {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid schema {}", path.display()))
    }

    /// Ordered data locations to try.
    pub fn candidates(&self) -> Vec<String> {
        if self.candidates.is_empty() {
            default_candidates(&self.data_file)
        } else {
            self.candidates.clone()
        }
    }

    /// The selectable list driving the selection controller, if any.
    pub fn primary_list(&self) -> Option<&EntityListSpec> {
        self.sections.iter().find_map(|section| match section {
            SectionSpec::EntityList(list) => Some(list),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SectionSpec {
    EntityList(EntityListSpec),
    Stats(StatsSpec),
    Bars(BarsSpec),
    CardGrid(CardGridSpec),
    Table(TableSpec),
    Feed(FeedSpec),
    LayerTree(LayerTreeSpec),
}

impl SectionSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            SectionSpec::EntityList(_) => "entity-list",
            SectionSpec::Stats(_) => "stats",
            SectionSpec::Bars(_) => "bars",
            SectionSpec::CardGrid(_) => "card-grid",
            SectionSpec::Table(_) => "table",
            SectionSpec::Feed(_) => "feed",
            SectionSpec::LayerTree(_) => "layer-tree",
        }
    }
}

fn name_field() -> String {
    "name".to_string()
}

fn tags_field() -> String {
    "projects".to_string()
}

/// Sidebar list of selectable entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EntityListSpec {
    pub collection: String,
    pub heading: String,
    #[serde(default = "name_field")]
    pub name: String,
    /// Template key expanded against each entity.
    #[serde(default)]
    pub caption: Option<String>,
    /// Id of an entity rendered as a "show all" item that clears the selection.
    #[serde(default)]
    pub clear_item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatsSpec {
    #[serde(default)]
    pub heading: Option<String>,
    pub cards: Vec<StatCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatCard {
    pub label: String,
    /// Dotted document path of the value.
    pub value: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// Object the caption placeholders are read from.
    #[serde(default)]
    pub context: Option<String>,
    /// State in the `bar` category used for the card accent.
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BarsSpec {
    #[serde(default)]
    pub heading: Option<String>,
    pub bars: Vec<BarSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BarSpec {
    pub label: String,
    /// Dotted document path of the percentage.
    pub value: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusDisplay {
    #[default]
    Badge,
    Dot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatusSpec {
    pub field: String,
    pub category: String,
    /// Bilingual field carrying the badge text.
    #[serde(default)]
    pub label: Option<String>,
    /// Localization key prefix for the badge text when `label` is absent.
    #[serde(default)]
    pub label_prefix: Option<String>,
    #[serde(default)]
    pub display: StatusDisplay,
    /// Template key for the hover title.
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DetailSpec {
    pub field: String,
    pub label: String,
    #[serde(default)]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupSpec {
    pub field: String,
    pub groups: Vec<GroupEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupEntry {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CardGridSpec {
    pub collection: String,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default = "name_field")]
    pub name: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "tags_field")]
    pub tags: String,
    #[serde(default)]
    pub status: Option<StatusSpec>,
    /// Plain list field rendered as chips.
    #[serde(default)]
    pub chips: Option<String>,
    #[serde(default)]
    pub details: Vec<DetailSpec>,
    #[serde(default)]
    pub notes: Vec<DetailSpec>,
    #[serde(default)]
    pub progress: Option<String>,
    #[serde(default)]
    pub group: Option<GroupSpec>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnKind {
    /// Bilingual field.
    #[default]
    Text,
    /// Raw scalar shown as-is in both languages.
    Plain,
    Badge,
    Progress,
    /// Raw value looked up under `label-prefix`, falling back to itself.
    Mapped,
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Threshold {
    pub min: f64,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ColumnSpec {
    pub header: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub label_prefix: Option<String>,
    /// Field whose value picks the progress tone in `category`.
    #[serde(default)]
    pub tone_field: Option<String>,
    /// Descending `min` thresholds picking the progress tone in `category`.
    #[serde(default)]
    pub thresholds: Vec<Threshold>,
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableSpec {
    pub collection: String,
    #[serde(default)]
    pub heading: Option<String>,
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedPrefix {
    #[default]
    Level,
    Date,
}

fn level_field() -> String {
    "level".to_string()
}

fn risk_category() -> String {
    category::RISK_LEVEL.to_string()
}

fn title_field() -> String {
    "title".to_string()
}

fn description_field() -> String {
    "description".to_string()
}

fn date_field() -> String {
    "date".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FeedSpec {
    pub collection: String,
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default = "level_field")]
    pub level: String,
    #[serde(default = "risk_category")]
    pub category: String,
    #[serde(default = "title_field")]
    pub title: String,
    #[serde(default = "description_field")]
    pub description: String,
    #[serde(default)]
    pub prefix: FeedPrefix,
    #[serde(default)]
    pub label_prefix: Option<String>,
    #[serde(default = "date_field")]
    pub date: String,
}

fn layers_field() -> String {
    "layers".to_string()
}

fn layer_category() -> String {
    category::LAYER.to_string()
}

fn total_field() -> String {
    "totalCost".to_string()
}

fn sections_field() -> String {
    "sections".to_string()
}

fn items_field() -> String {
    "items".to_string()
}

fn compact_layers() -> Vec<String> {
    vec!["costpool".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayerTreeSpec {
    #[serde(default = "layers_field")]
    pub collection: String,
    #[serde(default = "layer_category")]
    pub category: String,
    #[serde(default = "name_field")]
    pub name: String,
    #[serde(default = "total_field")]
    pub total: String,
    #[serde(default = "sections_field")]
    pub sections: String,
    #[serde(default = "items_field")]
    pub items: String,
    /// Layer ids rendered with the dense cost-pool grid.
    #[serde(default = "compact_layers")]
    pub compact: Vec<String>,
    #[serde(default = "tags_field")]
    pub tags: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bundled_schema_parses() {
        for name in DashboardSchema::bundled_names() {
            let schema = DashboardSchema::bundled(name).unwrap();
            assert_eq!(schema.name, name);
            assert!(!schema.sections.is_empty(), "{name} has no sections");
        }
    }

    #[test]
    fn default_candidates_follow_data_file() {
        let schema = DashboardSchema::bundled("tbm-tower").unwrap();
        assert_eq!(
            schema.candidates(),
            vec![
                "./tbm_tower_view_data.json",
                "../data/tbm_tower_view_data.json",
                "./data/tbm_tower_view_data.json",
                "tbm_tower_view_data.json",
            ]
        );
    }

    #[test]
    fn primary_list_is_first_entity_list() {
        let schema = DashboardSchema::bundled("project-view").unwrap();
        let list = schema.primary_list().unwrap();
        assert_eq!(list.collection, "departments");
        assert_eq!(list.clear_item.as_deref(), Some("all"));
        assert!(DashboardSchema::bundled("it-portfolio")
            .unwrap()
            .primary_list()
            .is_none());
    }

    #[test]
    fn layer_tree_defaults() {
        let raw = "name: t\ntitle: t\ndata-file: t.json\nsections:\n  - kind: layer-tree\n";
        let schema = DashboardSchema::from_yaml(raw).unwrap();
        match &schema.sections[0] {
            SectionSpec::LayerTree(tree) => {
                assert_eq!(tree.collection, "layers");
                assert_eq!(tree.compact, vec!["costpool"]);
                assert_eq!(tree.tags, "projects");
            }
            other => panic!("unexpected section {}", other.kind()),
        }
    }

    #[test]
    fn unknown_dashboard_is_an_error() {
        assert!(DashboardSchema::bundled("nope").is_err());
        assert!(DashboardSchema::resolve("definitely/not/here.yaml").is_err());
    }
}
