// SPDX-License-Identifier: PMPL-1.0-or-later

//! Built-in translation catalog for the bundled dashboards.
//!
//! Embeds every label the five bundled dashboard schemas reference, for both
//! supported languages, as compile-time static tables.
//!
//! ## Adding a new key
//!
//! 1. Add the Japanese entry to `JA` (the default language)
//! 2. Add the English entry to `EN` (missing keys fall back to Japanese)
//!
//! Templates may reference entity fields with `{field}`; see
//! [`LocalizationTable::format`](super::LocalizationTable::format).

use serde::{Deserialize, Serialize};

/// Supported dashboard languages.
///
/// Exactly two states: the language controller can never reach a third.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Ja,
    En,
}

impl Lang {
    /// ISO 639-1 two-letter code, also the persisted preference value.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::Ja => "ja",
            Lang::En => "en",
        }
    }

    /// Parse an ISO 639-1 code. Surrounding whitespace and case are ignored.
    pub fn from_code(code: &str) -> Option<Lang> {
        match code.trim().to_ascii_lowercase().as_str() {
            "ja" => Some(Lang::Ja),
            "en" => Some(Lang::En),
            _ => None,
        }
    }

    pub fn all() -> &'static [Lang] {
        &[Lang::Ja, Lang::En]
    }

    /// Suffix of bilingual data fields (`nameJA`, `nameEN`).
    pub fn field_suffix(&self) -> &'static str {
        match self {
            Lang::Ja => "JA",
            Lang::En => "EN",
        }
    }

    /// Label shown on the language selector control.
    pub fn control_label(&self) -> &'static str {
        match self {
            Lang::Ja => "日本語",
            Lang::En => "English",
        }
    }

    /// Class carried by the text node holding this language's variant.
    pub fn span_class(&self) -> &'static str {
        match self {
            Lang::Ja => "lang-ja",
            Lang::En => "lang-en",
        }
    }
}

impl Default for Lang {
    fn default() -> Self {
        Lang::Ja
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Static catalog for `lang`.
pub fn builtin_catalog(lang: Lang) -> &'static [(&'static str, &'static str)] {
    match lang {
        Lang::Ja => JA,
        Lang::En => EN,
    }
}

// ─── Japanese (default language, every key defined here) ────────────

const JA: &[(&str, &str)] = &[
    // Shared chrome
    ("common.clear", "選択解除"),
    ("common.language", "言語"),
    ("error.load", "データの読み込みに失敗しました。"),
    ("error.detail", "エラー: {message}"),
    ("error.candidates", "以下のいずれかにJSONファイルを配置してください："),
    // Application layer
    ("app.title", "アプリケーションレイヤー鳥瞰図"),
    ("app.sidebar", "プロジェクト一覧"),
    ("app.heading", "アプリケーション一覧"),
    ("app.projectCaption", "{status} - {progress}%"),
    ("app.eolTitle", "{eolDate} / {eolDateEN}"),
    // Data layer
    ("data.title", "データレイヤー鳥瞰図"),
    ("data.sidebar", "プロジェクト一覧"),
    ("data.projectCaption", "進捗: {progress}% | {status}"),
    ("data.stats.total", "総データ基盤数"),
    ("data.stats.transaction", "トランザクションDB"),
    ("data.stats.transactionNote", "業務処理用"),
    ("data.stats.master", "マスタDB"),
    ("data.stats.masterNote", "基準情報"),
    ("data.stats.log", "ログ/履歴DB"),
    ("data.stats.logNote", "監査・分析用"),
    ("data.stats.dwh", "分析基盤"),
    ("data.stats.dwhNote", "DWH・BI用"),
    ("data.group.ecommerce", "ECサイトデータ基盤"),
    ("data.group.coresystem", "基幹システムデータ基盤"),
    ("data.group.rpa", "RPAデータ基盤"),
    ("data.group.subscription", "サブスクリプションサービスデータ基盤"),
    ("data.group.dwh", "全社データ分析基盤"),
    ("data.group.backup", "バックアップ・アーカイブ"),
    ("data.detail.implementation", "実装"),
    ("data.detail.size", "容量"),
    ("data.detail.records", "レコード数"),
    ("data.detail.memory", "メモリ"),
    ("data.detail.pipelines", "パイプライン数"),
    // IT portfolio
    ("it.title", "ITポートフォリオ管理ダッシュボード"),
    ("it.metrics.totalProjects", "総プロジェクト数"),
    ("it.metrics.totalProjectsCaption", "進行中: {inProgress} | 計画中: {planned}"),
    ("it.metrics.totalInvestment", "総投資額"),
    ("it.metrics.totalInvestmentCaption", "予算執行率: {budgetUtilization}"),
    ("it.metrics.averageROI", "平均ROI"),
    ("it.metrics.averageROICaption", "目標: {target}"),
    ("it.metrics.highRisk", "高リスクPJ"),
    ("it.metrics.highRiskCaption", "要注意プロジェクト"),
    ("it.budget.heading", "予算配分 (Run/Grow/Transform)"),
    ("it.budget.run", "Run (維持・運用)"),
    ("it.budget.grow", "Grow (改善・拡大)"),
    ("it.budget.transform", "Transform (変革)"),
    ("it.strategy.heading", "戦略目標別投資"),
    ("it.strategy.customerExperience", "顧客体験向上"),
    ("it.strategy.operationalEfficiency", "業務効率化"),
    ("it.strategy.newBusiness", "新規事業創出"),
    ("it.strategy.security", "セキュリティ強化"),
    ("it.strategy.infrastructure", "基盤刷新"),
    ("it.projects.heading", "主要プロジェクト一覧"),
    ("it.projects.col.name", "プロジェクト名"),
    ("it.projects.col.status", "ステータス"),
    ("it.projects.col.budget", "予算"),
    ("it.projects.col.progress", "進捗"),
    ("it.projects.col.goal", "戦略目標"),
    ("it.projects.col.roi", "ROI予測"),
    ("it.resources.heading", "人的リソース配置状況"),
    ("it.resources.col.role", "役割"),
    ("it.resources.col.available", "人数"),
    ("it.resources.col.utilization", "稼働率"),
    ("it.resources.col.current", "現在"),
    ("it.resources.col.threeMonths", "3ヶ月後"),
    ("it.resources.col.endOfTerm", "期末"),
    ("it.resources.available", "{available}名"),
    ("it.risks.heading", "主要リスク・課題"),
    ("it.milestones.heading", "今後の重要マイルストーン"),
    ("status.portfolio.onTrack", "順調"),
    ("status.portfolio.caution", "注意"),
    ("status.portfolio.delayed", "遅延"),
    ("goal.CX Enhancement", "顧客体験向上"),
    ("goal.Infrastructure Renewal", "基盤刷新"),
    ("goal.Operational Efficiency", "業務効率化"),
    ("goal.New Business Creation", "新規事業創出"),
    ("goal.Security Enhancement", "セキュリティ強化"),
    ("load.overload", "過負荷"),
    ("load.high", "高稼働"),
    ("load.optimal", "適正"),
    ("load.available", "余裕あり"),
    ("risk.level.high", "【高】"),
    ("risk.level.medium", "【中】"),
    ("risk.level.low", "【低】"),
    // Project overview
    ("proj.title", "プロジェクト鳥瞰図"),
    ("proj.sidebar", "部門"),
    ("proj.heading", "プロジェクト一覧"),
    ("proj.deptCaption", "{projectCount}プロジェクト"),
    ("proj.detail.phase", "フェーズ"),
    ("proj.detail.budget", "予算"),
    ("proj.detail.progress", "進捗"),
    ("proj.detail.duration", "期間:"),
    ("proj.detail.goal", "目標:"),
    // TBM tower
    ("tbm.title", "TBMタワービュー"),
    ("tbm.sidebar", "プロジェクト"),
    ("tbm.projectCaption", "{cost}"),
];

// ─── English ────────────────────────────────────────────────────────

const EN: &[(&str, &str)] = &[
    ("common.clear", "Clear selection"),
    ("common.language", "Language"),
    ("error.load", "Failed to load dashboard data."),
    ("error.detail", "Error: {message}"),
    ("error.candidates", "Place the JSON file at one of the following locations:"),
    ("app.title", "Application Layer Overview"),
    ("app.sidebar", "Projects"),
    ("app.heading", "Applications"),
    ("app.projectCaption", "{status} - {progress}%"),
    ("app.eolTitle", "{eolDate} / {eolDateEN}"),
    ("data.title", "Data Layer Overview"),
    ("data.sidebar", "Projects"),
    ("data.projectCaption", "Progress: {progress}% | {status}"),
    ("data.stats.total", "Total Data Foundations"),
    ("data.stats.transaction", "Transaction DB"),
    ("data.stats.transactionNote", "Operational"),
    ("data.stats.master", "Master DB"),
    ("data.stats.masterNote", "Reference Data"),
    ("data.stats.log", "Log/History DB"),
    ("data.stats.logNote", "Audit & Analytics"),
    ("data.stats.dwh", "Analytics"),
    ("data.stats.dwhNote", "DWH & BI"),
    ("data.group.ecommerce", "E-Commerce Data Foundation"),
    ("data.group.coresystem", "Core System Data Foundation"),
    ("data.group.rpa", "RPA Data Foundation"),
    ("data.group.subscription", "Subscription Service Data Foundation"),
    ("data.group.dwh", "Enterprise Analytics Platform"),
    ("data.group.backup", "Backup & Archive"),
    ("data.detail.implementation", "Implementation"),
    ("data.detail.size", "Size"),
    ("data.detail.records", "Records"),
    ("data.detail.memory", "Memory"),
    ("data.detail.pipelines", "Pipelines"),
    ("it.title", "IT Portfolio Management Dashboard"),
    ("it.metrics.totalProjects", "Total Projects"),
    ("it.metrics.totalProjectsCaption", "In Progress: {inProgress} | Planned: {planned}"),
    ("it.metrics.totalInvestment", "Total Investment"),
    ("it.metrics.totalInvestmentCaption", "Budget Utilization: {budgetUtilization}"),
    ("it.metrics.averageROI", "Average ROI"),
    ("it.metrics.averageROICaption", "Target: {target}"),
    ("it.metrics.highRisk", "High Risk Projects"),
    ("it.metrics.highRiskCaption", "Requires Attention"),
    ("it.budget.heading", "Budget Allocation (Run/Grow/Transform)"),
    ("it.budget.run", "Run (Maintenance & Operations)"),
    ("it.budget.grow", "Grow (Improvement & Expansion)"),
    ("it.budget.transform", "Transform (Transformation)"),
    ("it.strategy.heading", "Investment by Strategic Goal"),
    ("it.strategy.customerExperience", "Customer Experience Enhancement"),
    ("it.strategy.operationalEfficiency", "Operational Efficiency"),
    ("it.strategy.newBusiness", "New Business Development"),
    ("it.strategy.security", "Security Enhancement"),
    ("it.strategy.infrastructure", "Infrastructure Renewal"),
    ("it.projects.heading", "Key Projects"),
    ("it.projects.col.name", "Project"),
    ("it.projects.col.status", "Status"),
    ("it.projects.col.budget", "Budget"),
    ("it.projects.col.progress", "Progress"),
    ("it.projects.col.goal", "Strategic Goal"),
    ("it.projects.col.roi", "ROI Forecast"),
    ("it.resources.heading", "Resource Allocation"),
    ("it.resources.col.role", "Role"),
    ("it.resources.col.available", "Headcount"),
    ("it.resources.col.utilization", "Utilization"),
    ("it.resources.col.current", "Current"),
    ("it.resources.col.threeMonths", "In 3 Months"),
    ("it.resources.col.endOfTerm", "End of Term"),
    ("it.resources.available", "{available}"),
    ("it.risks.heading", "Key Risks & Issues"),
    ("it.milestones.heading", "Upcoming Milestones"),
    ("status.portfolio.onTrack", "On Track"),
    ("status.portfolio.caution", "Caution"),
    ("status.portfolio.delayed", "Delayed"),
    ("goal.CX Enhancement", "Customer Experience"),
    ("goal.Infrastructure Renewal", "Infrastructure"),
    ("goal.Operational Efficiency", "Efficiency"),
    ("goal.New Business Creation", "New Business"),
    ("goal.Security Enhancement", "Security"),
    ("load.overload", "Overloaded"),
    ("load.high", "High Load"),
    ("load.optimal", "Optimal"),
    ("load.available", "Available"),
    ("risk.level.high", "[High] "),
    ("risk.level.medium", "[Medium] "),
    ("risk.level.low", "[Low] "),
    ("proj.title", "Project Overview"),
    ("proj.sidebar", "Departments"),
    ("proj.heading", "Project List"),
    ("proj.deptCaption", "{projectCount} Projects"),
    ("proj.detail.phase", "Phase"),
    ("proj.detail.budget", "Budget"),
    ("proj.detail.progress", "Progress"),
    ("proj.detail.duration", "Duration:"),
    ("proj.detail.goal", "Goal:"),
    ("tbm.title", "TBM Tower View"),
    ("tbm.sidebar", "Projects"),
    ("tbm.projectCaption", "{cost}"),
];
