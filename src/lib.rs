// SPDX-License-Identifier: PMPL-1.0-or-later

//! dashbind: bilingual, cross-highlightable dashboards.
//!
//! A dashboard is a schema of sections bound to a JSON data document. The
//! renderer builds one page from schema, data, localization table and style
//! presets; a [`session::DashboardSession`] then drives interaction on that
//! page without re-rendering it.
//!
//! PIPELINE:
//! 1. **Config**: one optional YAML document overlays the built-in catalog
//!    and style presets.
//! 2. **Source**: the data document is fetched from the first answering
//!    candidate location (file or HTTP).
//! 3. **Render**: schema sections become DOM fragments carrying static
//!    classes, tag sets and bilingual text spans.
//! 4. **Session**: selection, language and layer controllers derive state
//!    classes on the rendered page.

pub mod config;
pub mod dom;
pub mod i18n;
pub mod render;
pub mod report;
pub mod session;
pub mod source;
pub mod storage;
pub mod style;
pub mod types;
