// SPDX-License-Identifier: PMPL-1.0-or-later

//! Internationalisation module for dashbind.
//!
//! Dashboards are bilingual: every label is rendered once per language and
//! the language controller only toggles which variant is visible.
//!
//! | Code | Language | Control label |
//! |------|----------|---------------|
//! | ja   | Japanese | 日本語         |
//! | en   | English  | English       |
//!
//! ## Design
//!
//! Translation keys use dotted namespaces: `"app.title"`,
//! `"it.metrics.totalProjects"`, `"load.overload"`. A [`LocalizationTable`]
//! resolves a key in the requested language, then in the table's default
//! language, then returns the key itself (fail-open, never panics).
//!
//! The built-in catalog is embedded at compile time and backs the degraded
//! mode where no configuration document is supplied. Configuration strings
//! overlay it key by key.

mod catalog;
mod table;

pub use catalog::{builtin_catalog, Lang};
pub use table::LocalizationTable;
