//! Summary sections, the plan that selects them, and their rendered lines.

use super::describe::DescribeTable;
use crate::config::SummaryConfig;
use crate::profiler::DataProfiler;
use crate::table::{ColumnKind, Table};
use crate::utils::format_2dp;
use serde::Serialize;

/// One part of the summary report, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Overview,
    ColumnTypes,
    NumericStatistics,
    CategoricalModes,
    MissingBreakdown,
    Outliers,
    Correlations,
    DatasetSummary,
    Completion,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Overview,
        Section::ColumnTypes,
        Section::NumericStatistics,
        Section::CategoricalModes,
        Section::MissingBreakdown,
        Section::Outliers,
        Section::Correlations,
        Section::DatasetSummary,
        Section::Completion,
    ];

    fn applies(self, facts: &PlanFacts) -> bool {
        match self {
            Section::NumericStatistics | Section::Outliers => facts.numeric_columns > 0,
            Section::CategoricalModes => facts.categorical_columns > 0,
            Section::Correlations => facts.numeric_columns > 1,
            _ => true,
        }
    }

    /// Whether a section pause follows this section.
    pub fn pauses_after(self) -> bool {
        matches!(
            self,
            Section::Overview
                | Section::ColumnTypes
                | Section::NumericStatistics
                | Section::CategoricalModes
                | Section::MissingBreakdown
                | Section::Outliers
        )
    }

    fn closes_with_break(self) -> bool {
        matches!(
            self,
            Section::NumericStatistics
                | Section::CategoricalModes
                | Section::MissingBreakdown
                | Section::Outliers
                | Section::Correlations
        )
    }

    /// Render this section's pieces. Statistics are computed here, so a
    /// section that is never reached is never computed.
    pub(crate) fn render(self, table: &Table, config: &SummaryConfig) -> Vec<Piece> {
        let mut pieces = match self {
            Section::Overview => overview(table),
            Section::ColumnTypes => column_types(table),
            Section::NumericStatistics => numeric_statistics(table),
            Section::CategoricalModes => categorical_modes(table),
            Section::MissingBreakdown => missing_breakdown(table),
            Section::Outliers => outliers(table, config.iqr_multiplier),
            Section::Correlations => correlations(table, config.top_correlations),
            Section::DatasetSummary => vec![
                Piece::Line("**Dataset Summary:**".to_string()),
                Piece::Line("Here's an overview of the dataset's statistics:".to_string()),
                Piece::Table(DescribeTable::from_table(table)),
            ],
            Section::Completion => vec![Piece::Line("✅ **Summary Completed!** 🎉".to_string())],
        };

        if self.closes_with_break() {
            pieces.push(Piece::Break);
        }
        if self.pauses_after() {
            pieces.push(Piece::Pause);
        }
        pieces
    }
}

/// Unit of a rendered section.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Piece {
    /// Text delivered through the typewriter.
    Line(String),
    /// A bare newline, delivered at once.
    Break,
    Table(DescribeTable),
    Pause,
}

struct PlanFacts {
    numeric_columns: usize,
    categorical_columns: usize,
}

/// Ordered sections that apply to a given table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPlan {
    sections: Vec<Section>,
}

impl SummaryPlan {
    /// Select the sections for a table. Column-kind counts are taken once.
    pub fn for_table(table: &Table) -> Self {
        let facts = PlanFacts {
            numeric_columns: table.count_of_kind(ColumnKind::Numeric),
            categorical_columns: table.count_of_kind(ColumnKind::Categorical),
        };

        Self {
            sections: Section::ALL
                .into_iter()
                .filter(|s| s.applies(&facts))
                .collect(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn contains(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }
}

fn overview(table: &Table) -> Vec<Piece> {
    vec![
        Piece::Line("📊 **Dataset Overview**".to_string()),
        Piece::Line(format!(
            "- This dataset has **{} rows** and **{} columns**.",
            table.row_count(),
            table.column_count()
        )),
        Piece::Line(format!(
            "- There are **{} missing values** spread across {} columns.",
            table.total_missing(),
            table.columns_with_missing()
        )),
        Piece::Line(format!(
            "- The dataset contains **{} duplicate rows**.",
            table.duplicate_row_count()
        )),
    ]
}

fn column_types(table: &Table) -> Vec<Piece> {
    vec![
        Piece::Line("📌 **Column Data Types**".to_string()),
        Piece::Line(format!(
            "- **Numeric Columns**: {}",
            table.count_of_kind(ColumnKind::Numeric)
        )),
        Piece::Line(format!(
            "- **Categorical Columns**: {}",
            table.count_of_kind(ColumnKind::Categorical)
        )),
    ]
}

fn numeric_statistics(table: &Table) -> Vec<Piece> {
    let mut pieces = vec![Piece::Line(
        "📈 **Statistics for Numeric Columns**".to_string(),
    )];
    for (name, summary) in DataProfiler::numeric_summaries(table) {
        pieces.push(Piece::Line(format!(
            "- **{}**: Mean = {}, Median = {}, Std Dev = {}",
            name,
            format_2dp(summary.mean),
            format_2dp(summary.median),
            format_2dp(summary.std)
        )));
    }
    pieces
}

fn categorical_modes(table: &Table) -> Vec<Piece> {
    let mut pieces = vec![Piece::Line(
        "🗂 **Most Frequent Values in Categorical Columns**".to_string(),
    )];
    for (name, mode) in DataProfiler::modes(table) {
        pieces.push(Piece::Line(format!(
            "- **{}**: Most common value = `{}`",
            name,
            mode.unwrap_or("n/a")
        )));
    }
    pieces
}

fn missing_breakdown(table: &Table) -> Vec<Piece> {
    let mut pieces = vec![Piece::Line("⚠️ **Missing Values Breakdown**".to_string())];
    for entry in DataProfiler::missing_breakdown(table) {
        pieces.push(Piece::Line(format!(
            "- **{}**: {} missing values ({}%)",
            entry.column,
            entry.count,
            format_2dp(entry.percent)
        )));
    }
    pieces
}

fn outliers(table: &Table, multiplier: f64) -> Vec<Piece> {
    let mut pieces = vec![Piece::Line(
        "📉 **Outlier Detection (IQR Method)**".to_string(),
    )];
    for (name, count) in DataProfiler::outlier_counts(table, multiplier) {
        pieces.push(Piece::Line(format!(
            "- **{}**: {} potential outliers detected.",
            name, count
        )));
    }
    pieces
}

fn correlations(table: &Table, limit: usize) -> Vec<Piece> {
    let mut pieces = vec![Piece::Line(format!(
        "📊 **Correlation Analysis** (Top {} Strongest Correlations)",
        limit
    ))];
    for pair in DataProfiler::top_correlations(table, limit) {
        pieces.push(Piece::Line(format!(
            "- **{} & {}**: Correlation = {}",
            pair.column_x,
            pair.column_y,
            format_2dp(pair.abs_correlation)
        )));
    }
    pieces
}
