// SPDX-License-Identifier: PMPL-1.0-or-later

//! Section renderers, one per [`SectionSpec`](super::SectionSpec) kind.

use super::schema::{
    BarsSpec, CardGridSpec, ColumnKind, ColumnSpec, DetailSpec, EntityListSpec, FeedPrefix,
    FeedSpec, LayerTreeSpec, StatsSpec, StatusDisplay, StatusSpec, TableSpec,
};
use super::{
    bilingual_field, grid_columns, Bilingual, Renderer, ENTITY_ATTR, EXPANDED_CLASS, LAYER_ATTR,
    TAGS_ATTR,
};
use crate::dom::NodeId;
use crate::i18n::Lang;
use crate::style::{category, TokenBundle};
use crate::types::{encode_tags, format_number, value_number, value_text, DataDocument, Entity};
use chrono::{DateTime, Datelike, NaiveDate};

/// Detail field always listed first when present.
const LEADING_DETAIL: &str = "implementation";

impl Renderer<'_> {
    pub(super) fn entity_list(&mut self, aside: NodeId, spec: &EntityListSpec, document: &DataDocument) {
        let section = self.doc.element_with(aside, "section", "entity-list");
        let heading = self.doc.element_with(
            section,
            "h2",
            "text-base font-semibold text-gray-800 mb-4 pb-2 border-b-2 border-gray-200",
        );
        self.label(heading, &spec.heading);
        let list = self.doc.element_with(section, "ul", "selectable-list");
        let entities = document.entities(&spec.collection);

        if let Some(clear_id) = &spec.clear_item {
            let all = entities
                .iter()
                .find(|entity| entity.id().as_deref() == Some(clear_id.as_str()));
            if let Some(entity) = all {
                let item = self.list_item(list, "clear-item", spec, entity, clear_id);
                self.doc.set_attr(item, "data-action", "clear");
                self.clear_controls.push(item);
            }
        }

        for entity in &entities {
            let Some(id) = entity.id() else { continue };
            if spec.clear_item.as_deref() == Some(id.as_str()) {
                continue;
            }
            let item = self.list_item(list, "selectable-item", spec, entity, &id);
            self.doc.set_attr(item, ENTITY_ATTR, &id);
            let name = bilingual_field(entity, &spec.name).unwrap_or_else(|| Bilingual {
                ja: id.clone(),
                en: id.clone(),
            });
            self.names.insert(id.clone(), name);
            self.selectables.push((item, id));
        }

        if spec.clear_item.is_none() {
            let button = self.doc.element_with(
                section,
                "button",
                "clear-selection w-full mt-3 py-2 rounded-lg text-sm text-gray-600 bg-gray-100 hover:bg-gray-200",
            );
            self.doc.set_attr(button, "type", "button");
            self.doc.set_attr(button, "data-action", "clear");
            self.label(button, "common.clear");
            self.clear_controls.push(button);
        }
    }

    fn list_item(
        &mut self,
        list: NodeId,
        role: &str,
        spec: &EntityListSpec,
        entity: &Entity<'_>,
        id: &str,
    ) -> NodeId {
        let item = self.doc.element_with(
            list,
            "li",
            "p-3 px-4 mb-2 rounded-lg cursor-pointer transition-all duration-300 border-l-[3px] border-transparent bg-gray-50 hover:bg-gray-100",
        );
        self.doc.add_class(item, role);
        let name = self.doc.element_with(item, "div", "entity-name text-sm text-gray-800 mb-1");
        if !self.field(name, entity, &spec.name, "") {
            self.bilingual(name, id, id);
        }
        if let Some(caption) = &spec.caption {
            let line = self.doc.element_with(item, "div", "entity-caption text-xs text-gray-500");
            self.template(line, caption, Some(entity));
        }
        item
    }

    pub(super) fn stats(&mut self, spec: &StatsSpec, document: &DataDocument) {
        let main = self.main;
        self.heading(main, spec.heading.as_deref());
        let grid = self.doc.element_with(
            main,
            "div",
            "stats-grid grid grid-cols-[repeat(auto-fit,minmax(200px,1fr))] gap-4 mb-6",
        );
        for card in &spec.cards {
            let node = self.doc.element_with(grid, "div", "stat-card bg-gray-50 p-4 rounded-lg border border-gray-200");
            if let Some(tone) = &card.tone {
                let accent = self.styles.resolve(category::BAR, tone).border.clone();
                self.doc.add_class(node, "border-l-4");
                self.doc.add_class(node, &accent);
            }
            let label = self.doc.element_with(node, "div", "stat-label text-xs text-gray-500 mb-1 uppercase tracking-wide");
            self.label(label, &card.label);
            if let Some(value) = document.value_at(&card.value).and_then(value_text) {
                let figure = self.doc.element_with(node, "div", "stat-value text-2xl font-bold text-gray-800");
                self.doc.text(figure, &value);
            }
            if let Some(caption) = &card.caption {
                let context = card.context.as_deref().and_then(|path| document.object_at(path));
                let line = self.doc.element_with(node, "div", "stat-caption text-xs text-gray-400 mt-1");
                self.template(line, caption, context.as_ref());
            }
        }
    }

    pub(super) fn bars(&mut self, spec: &BarsSpec, document: &DataDocument) {
        let panel = self.doc.element_with(self.main, "section", "bars-panel bg-white p-6 rounded-2xl shadow-sm mb-6");
        self.heading(panel, spec.heading.as_deref());
        let list = self.doc.element_with(panel, "div", "space-y-6");
        for bar in &spec.bars {
            let Some(value) = document.value_at(&bar.value).and_then(value_number) else {
                continue;
            };
            let row = self.doc.element_with(list, "div", "bar-row");
            let label = self.doc.element_with(row, "div", "bar-label text-sm text-gray-700 mb-2");
            self.label(label, &bar.label);

            let mut caption = format!("{}%", format_number(value));
            if let Some(amount) = bar.amount.as_deref().and_then(|path| document.value_at(path)).and_then(value_text) {
                caption.push_str(&format!(" ({})", amount));
            }
            let tone = bar.tone.as_deref().unwrap_or_default();
            let fill = self.styles.resolve(category::BAR, tone).bar.clone();
            self.progress_bar(row, value, &caption, &fill);
        }
    }

    pub(super) fn card_grid(&mut self, spec: &CardGridSpec, document: &DataDocument) {
        let section = self.doc.element_with(self.main, "section", "card-grid-section mb-6");
        self.heading(section, spec.heading.as_deref());
        let entities = document.entities(&spec.collection);

        let Some(group) = &spec.group else {
            let grid = self.doc.element_with(section, "div", card_grid_classes());
            for entity in &entities {
                self.card(grid, spec, entity);
            }
            return;
        };

        for entry in &group.groups {
            let members: Vec<&Entity<'_>> = entities
                .iter()
                .filter(|entity| entity.text(&group.field).as_deref() == Some(entry.key.as_str()))
                .collect();
            if members.is_empty() {
                continue;
            }
            let header = self.doc.element_with(section, "div", "card-group my-8 py-4 border-t-2 border-gray-200");
            self.doc.set_attr(header, "data-group", &entry.key);
            let title = self.doc.element_with(header, "div", "text-base font-semibold text-gray-800 mb-4 flex items-center gap-2");
            if let Some(icon) = &entry.icon {
                let badge = self.doc.element_with(
                    title,
                    "div",
                    "w-6 h-6 flex items-center justify-center bg-gradient-to-br from-purple-500 to-purple-700 rounded-md text-white text-sm",
                );
                self.doc.text(badge, icon);
            }
            self.label(title, &entry.title);
            let grid = self.doc.element_with(section, "div", card_grid_classes());
            for entity in members {
                self.card(grid, spec, entity);
            }
        }
    }

    fn card(&mut self, grid: NodeId, spec: &CardGridSpec, entity: &Entity<'_>) {
        let card = self.doc.element_with(
            grid,
            "div",
            "entity-card relative bg-gray-50 p-5 rounded-xl border-2 border-gray-200 transition-all duration-300",
        );
        self.doc.set_attr(card, TAGS_ATTR, &encode_tags(&entity.tags(&spec.tags)));
        if let Some(id) = entity.id() {
            self.doc.set_attr(card, "data-id", &id);
        }
        self.cards.push(card);

        let status = spec.status.as_ref().map(|status| {
            let state = entity.text(&status.field).unwrap_or_default();
            let bundle = self.styles.resolve(&status.category, &state).clone();
            (status, state, bundle)
        });
        if let Some((status, state, bundle)) = &status {
            self.doc.set_attr(card, "data-status", state);
            if status.display == StatusDisplay::Dot {
                self.status_dot(card, status, bundle, entity);
            }
        }

        let header = self.doc.element_with(card, "div", "card-header flex items-start gap-3 mb-3");
        if let Some(icon) = spec.icon.as_deref().and_then(|field| entity.text(field)) {
            let node = self.doc.element_with(header, "div", "card-icon text-3xl flex-shrink-0");
            self.doc.text(node, &icon);
        }
        let titles = self.doc.element_with(header, "div", "flex-1");
        let name = self.doc.element_with(titles, "div", "card-title text-base font-semibold text-gray-800 mb-1");
        if !self.field(name, entity, &spec.name, "") {
            let id = entity.id().unwrap_or_default();
            self.bilingual(name, &id, &id);
        }
        if let Some(subtitle) = &spec.subtitle {
            if bilingual_field(entity, subtitle).is_some() {
                let node = self.doc.element_with(titles, "div", "card-subtitle text-xs text-gray-500");
                self.field(node, entity, subtitle, "");
            }
        }
        if let Some((status, state, bundle)) = &status {
            if status.display == StatusDisplay::Badge {
                self.status_badge(header, status, state, bundle, entity);
            }
        }

        self.details(card, &spec.details, entity);

        if let Some(value) = spec.progress.as_deref().and_then(|field| entity.number(field)) {
            let tone = match &status {
                Some((_, _, bundle)) => bundle.bar.clone(),
                None => self.styles.fallback().bar.clone(),
            };
            let wrap = self.doc.element_with(card, "div", "card-progress mb-4");
            self.progress_bar(wrap, value, &format!("{}%", format_number(value)), &format!("bg-gradient-to-r {}", tone));
        }

        let notes: Vec<&DetailSpec> = spec
            .notes
            .iter()
            .filter(|note| bilingual_field(entity, &note.field).is_some())
            .collect();
        if !notes.is_empty() {
            let block = self.doc.element_with(card, "div", "card-notes text-xs space-y-2 text-gray-600");
            for note in notes {
                let line = self.doc.element(block, "div");
                let label = self.doc.element_with(line, "strong", "text-gray-800");
                self.label(label, &note.label);
                self.doc.text(line, " ");
                let suffix = note.suffix.as_deref().unwrap_or_default();
                self.field(line, entity, &note.field, suffix);
            }
        }

        if let Some(field) = &spec.chips {
            let chips = entity.list(field);
            if !chips.is_empty() {
                let row = self.doc.element_with(card, "div", "card-chips flex flex-wrap gap-1.5");
                for chip in chips {
                    let node = self.doc.element_with(
                        row,
                        "span",
                        "chip inline-block px-2 py-0.5 bg-blue-100 text-blue-700 rounded text-[10px] font-medium",
                    );
                    self.doc.text(node, &chip);
                }
            }
        }
    }

    fn status_dot(&mut self, card: NodeId, status: &StatusSpec, bundle: &TokenBundle, entity: &Entity<'_>) {
        let dot = self.doc.element_with(
            card,
            "div",
            "status-dot absolute -top-2 -right-2 w-4 h-4 rounded-full border-2 border-white",
        );
        self.doc.add_class(dot, &bundle.background);
        if let Some(title) = &status.title {
            let text = self.strings.format(self.strings.default_lang(), title, Some(entity));
            self.doc.set_attr(dot, "title", &text);
        }
    }

    fn status_badge(
        &mut self,
        parent: NodeId,
        status: &StatusSpec,
        state: &str,
        bundle: &TokenBundle,
        entity: &Entity<'_>,
    ) {
        let badge = self.doc.element_with(
            parent,
            "span",
            "status-badge px-3 py-1 rounded-full text-xs font-semibold whitespace-nowrap",
        );
        self.doc.add_class(badge, &bundle.badge_classes());
        if !bundle.border.is_empty() {
            self.doc.add_class(badge, "border");
        }
        let from_field = status
            .label
            .as_deref()
            .map(|field| self.field(badge, entity, field, ""))
            .unwrap_or(false);
        if !from_field {
            let prefix = status.label_prefix.as_deref().unwrap_or_default();
            let key = format!("{}{}", prefix, state);
            let ja = self.lookup_or(Lang::Ja, &key, state);
            let en = self.lookup_or(Lang::En, &key, state);
            self.bilingual(badge, &ja, &en);
        }
    }

    fn details(&mut self, card: NodeId, details: &[DetailSpec], entity: &Entity<'_>) {
        let mut present: Vec<&DetailSpec> = details
            .iter()
            .filter(|detail| bilingual_field(entity, &detail.field).is_some())
            .collect();
        if present.is_empty() {
            return;
        }
        // stable: the rest keep schema order
        present.sort_by_key(|detail| detail.field != LEADING_DETAIL);

        let grid = self.doc.element_with(card, "div", "card-details grid grid-cols-2 gap-2.5 mb-3");
        for detail in present {
            let item = self.doc.element_with(grid, "div", "detail-item bg-white p-2 px-2.5 rounded-md border border-gray-200");
            self.doc.set_attr(item, "data-field", &detail.field);
            let label = self.doc.element_with(item, "div", "detail-label text-[10px] text-gray-400 mb-0.5");
            self.label(label, &detail.label);
            let value = self.doc.element_with(item, "div", "detail-value text-sm font-semibold text-gray-800");
            let suffix = detail.suffix.as_deref().unwrap_or_default();
            self.field(value, entity, &detail.field, suffix);
        }
    }

    pub(super) fn table(&mut self, spec: &TableSpec, document: &DataDocument) {
        let panel = self.doc.element_with(self.main, "section", "table-panel bg-white p-6 rounded-2xl shadow-sm mb-6 overflow-x-auto");
        self.heading(panel, spec.heading.as_deref());
        let table = self.doc.element_with(panel, "table", "data-table w-full text-sm");
        let head = self.doc.element(table, "thead");
        let head_row = self.doc.element(head, "tr");
        for column in &spec.columns {
            let cell = self.doc.element_with(head_row, "th", "py-3 px-2 text-left text-xs font-semibold text-gray-500 border-b-2 border-gray-200");
            self.label(cell, &column.header);
        }

        let body = self.doc.element(table, "tbody");
        for entity in document.entities(&spec.collection) {
            let row = self.doc.element_with(body, "tr", "table-row hover:bg-gray-50 transition-colors duration-200");
            if let Some(id) = entity.id() {
                self.doc.set_attr(row, "data-id", &id);
            }
            for column in &spec.columns {
                let cell = self.doc.element_with(row, "td", "py-3 px-2 border-b border-gray-100");
                self.cell(cell, column, &entity);
            }
        }
    }

    fn cell(&mut self, cell: NodeId, column: &ColumnSpec, entity: &Entity<'_>) {
        let category = column.category.as_deref().unwrap_or_default();
        match column.kind {
            ColumnKind::Text => {
                self.field(cell, entity, &column.field, "");
            }
            ColumnKind::Plain => {
                if let Some(text) = entity.text(&column.field) {
                    self.doc.text(cell, &text);
                }
            }
            ColumnKind::Badge => {
                let Some(state) = entity.text(&column.field) else { return };
                let bundle = self.styles.resolve(category, &state).clone();
                let badge = self.doc.element_with(cell, "span", "status-badge py-1 px-3 rounded-xl text-xs font-semibold");
                self.doc.add_class(badge, &bundle.badge_classes());
                let key = format!("{}{}", column.label_prefix.as_deref().unwrap_or_default(), state);
                let ja = self.lookup_or(Lang::Ja, &key, &state);
                let en = self.lookup_or(Lang::En, &key, &state);
                self.bilingual(badge, &ja, &en);
            }
            ColumnKind::Progress => {
                let Some(value) = entity.number(&column.field) else { return };
                let state = match &column.tone_field {
                    Some(field) => entity.text(field).unwrap_or_default(),
                    None => column
                        .thresholds
                        .iter()
                        .find(|threshold| value >= threshold.min)
                        .map(|threshold| threshold.state.clone())
                        .unwrap_or_default(),
                };
                let fill = self.styles.resolve(category, &state).bar.clone();
                self.progress_bar(cell, value, &format!("{}%", format_number(value)), &fill);
            }
            ColumnKind::Mapped => {
                let Some(raw) = entity.text(&column.field) else { return };
                let key = format!("{}{}", column.label_prefix.as_deref().unwrap_or_default(), raw);
                let ja = self.lookup_or(Lang::Ja, &key, &raw);
                let en = self.lookup_or(Lang::En, &key, &raw);
                self.bilingual(cell, &ja, &en);
            }
            ColumnKind::Template => {
                if let Some(template) = &column.template {
                    self.template(cell, template, Some(entity));
                }
            }
        }
    }

    pub(super) fn feed(&mut self, spec: &FeedSpec, document: &DataDocument) {
        let panel = self.doc.element_with(self.main, "section", "feed-panel bg-white p-6 rounded-2xl shadow-sm mb-6");
        self.heading(panel, spec.heading.as_deref());
        let list = self.doc.element_with(panel, "ul", "feed-list space-y-3");
        for entity in document.entities(&spec.collection) {
            let level = entity.text(&spec.level).unwrap_or_default();
            let border = self.styles.resolve(&spec.category, &level).border.clone();
            let item = self.doc.element_with(list, "li", "feed-item p-4 rounded-lg border-l-4 bg-gray-50");
            self.doc.add_class(item, &border);
            self.doc.set_attr(item, "data-level", &level);

            let title = bilingual_field(&entity, &spec.title).unwrap_or_else(|| Bilingual {
                ja: String::new(),
                en: String::new(),
            });
            let (ja, en) = match spec.prefix {
                FeedPrefix::Level => {
                    let key = format!("{}{}", spec.label_prefix.as_deref().unwrap_or_default(), level);
                    let (ja_raw, en_raw) = level_prefix(&level);
                    (
                        format!("{}{}", self.lookup_or(Lang::Ja, &key, &ja_raw), title.ja),
                        format!("{}{}", self.lookup_or(Lang::En, &key, &en_raw), title.en),
                    )
                }
                FeedPrefix::Date => match entity.text(&spec.date) {
                    Some(raw) => (
                        format!("{}: {}", format_date(&raw, Lang::Ja), title.ja),
                        format!("{}: {}", format_date(&raw, Lang::En), title.en),
                    ),
                    None => (title.ja, title.en),
                },
            };
            let headline = self.doc.element_with(item, "div", "feed-title font-semibold text-sm text-gray-800 mb-1");
            self.bilingual(headline, &ja, &en);

            if bilingual_field(&entity, &spec.description).is_some() {
                let description = self.doc.element_with(item, "div", "feed-description text-xs text-gray-600");
                self.field(description, &entity, &spec.description, "");
            }
        }
    }

    pub(super) fn layer_tree(&mut self, spec: &LayerTreeSpec, document: &DataDocument) {
        let tree = self.doc.element_with(self.main, "div", "layer-tree space-y-1");
        for (index, layer) in document.entities(&spec.collection).iter().enumerate() {
            let id = layer.id().unwrap_or_default();
            let bundle = self.styles.resolve(&spec.category, &id).clone();
            let compact = spec.compact.iter().any(|compact| *compact == id);

            let node = self.doc.element_with(tree, "div", "tower-layer mb-1 rounded-lg overflow-hidden");
            self.doc.set_attr(node, LAYER_ATTR, &id);
            if index == 0 {
                self.doc.add_state_class(node, EXPANDED_CLASS);
            }
            self.layers.push((node, id.clone()));

            let header = self.doc.element_with(
                node,
                "div",
                "layer-header py-4 px-5 font-semibold text-sm text-white cursor-pointer flex justify-between items-center bg-gradient-to-r",
            );
            self.doc.add_class(header, &bundle.bar);
            let title = self.doc.element_with(header, "div", "layer-title");
            if !self.field(title, layer, &spec.name, "") {
                self.bilingual(title, &id, &id);
            }
            let side = self.doc.element_with(header, "div", "flex items-center gap-4");
            if let Some(total) = layer.text(&spec.total) {
                let node = self.doc.element_with(side, "span", "layer-total font-bold");
                self.doc.text(node, &total);
            }
            let icon = self.doc.element_with(side, "span", "expand-icon transition-transform duration-300");
            self.doc.text(icon, "▾");

            let content = self.doc.element_with(node, "div", "layer-content bg-gradient-to-r p-5");
            self.doc.add_class(content, &bundle.background);
            for section in layer.children(&spec.sections) {
                self.layer_section(content, spec, &section, &bundle, compact);
            }
        }
    }

    fn layer_section(
        &mut self,
        content: NodeId,
        spec: &LayerTreeSpec,
        section: &Entity<'_>,
        bundle: &TokenBundle,
        compact: bool,
    ) {
        let block = self.doc.element_with(content, "div", "layer-section mb-5");
        if bilingual_field(section, "title").is_some() {
            let title = self.doc.element_with(block, "div", "section-title text-sm font-semibold text-gray-700 mb-3");
            self.field(title, section, "title", "");
            if compact {
                if let Some(total) = section.text(&spec.total) {
                    let node = self.doc.element_with(title, "span", "section-total font-normal text-indigo-600");
                    self.doc.text(node, &format!(" ({})", total));
                }
            }
        }

        let items = section.children(&spec.items);
        let grid = self.doc.element_with(block, "div", "grid gap-3");
        self.doc.add_class(grid, grid_columns(items.len(), compact));
        for item in &items {
            let card = self.doc.element_with(
                grid,
                "div",
                "category-item bg-white rounded-lg shadow-sm border-l-4 cursor-pointer transition-all duration-300",
            );
            self.doc.add_class(card, if compact { "p-3" } else { "p-4" });
            self.doc.add_class(card, &bundle.border);
            self.doc.set_attr(card, TAGS_ATTR, &encode_tags(&item.tags(&spec.tags)));
            self.cards.push(card);

            let name = self.doc.element_with(card, "div", "item-name font-medium text-gray-700 mb-2");
            self.doc.add_class(name, if compact { "text-xs" } else { "text-sm" });
            if !self.field(name, item, &spec.name, "") {
                self.bilingual(name, "", "");
            }
            if !compact {
                if let Some(technology) = item.text("technology") {
                    let node = self.doc.element_with(card, "div", "item-technology text-xs text-gray-500 mb-2");
                    self.doc.text(node, &technology);
                }
            }
            if let Some(cost) = item.text("cost") {
                let node = self.doc.element_with(card, "div", "item-cost font-bold text-gray-800");
                self.doc.add_class(node, if compact { "text-base" } else { "text-lg" });
                self.doc.text(node, &cost);
            }
        }
    }
}

fn card_grid_classes() -> &'static str {
    "card-grid grid grid-cols-[repeat(auto-fill,minmax(280px,1fr))] gap-5 mt-5"
}

/// Bracketed level used when the table has no label for it: `【critical】` /
/// `[Critical] `. An empty level gets no prefix.
fn level_prefix(level: &str) -> (String, String) {
    let mut chars = level.chars();
    match chars.next() {
        Some(first) => (
            format!("【{}】", level),
            format!("[{}{}] ", first.to_uppercase(), chars.as_str()),
        ),
        None => (String::new(), String::new()),
    }
}

/// `2025-03-15` → `3月15日` / `Mar 15`. Unparseable dates are shown as-is.
pub(crate) fn format_date(raw: &str, lang: Lang) -> String {
    let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw.trim()).ok().map(|dt| dt.date_naive()));
    match (parsed, lang) {
        (Some(date), Lang::Ja) => format!("{}月{}日", date.month(), date.day()),
        (Some(date), Lang::En) => date.format("%b %-d").to_string(),
        (None, _) => raw.to_string(),
    }
}
