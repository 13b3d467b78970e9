// src/analyze.rs

use arrow::array::{Float64Array, StringArray};
use std::{collections::BTreeMap, fmt};
use tracing::info;

use crate::clean::schema::{PRODUCT, REGION};
use crate::table::SalesTable;

/// Placeholder for an insight that cannot be computed.
pub const DATA_UNAVAILABLE: &str = "Data Unavailable";

/// The reported metrics, in report order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalSales,
    BestSellingProduct,
    WorstSellingProduct,
    TopRegion,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::TotalSales,
        Metric::BestSellingProduct,
        Metric::WorstSellingProduct,
        Metric::TopRegion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::TotalSales => "Total Sales",
            Metric::BestSellingProduct => "Best-Selling Product",
            Metric::WorstSellingProduct => "Worst-Selling Product",
            Metric::TopRegion => "Top Region",
        }
    }
}

/// One metric value: an amount or a label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InsightValue<'a> {
    Amount(f64),
    Label(&'a str),
}

impl fmt::Display for InsightValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightValue::Amount(v) => f.write_str(&format_amount(*v)),
            InsightValue::Label(s) => f.write_str(s),
        }
    }
}

/// Render an amount the way it reads in a spreadsheet export: whole numbers
/// keep one decimal place (`150.0`), fractions print in shortest form, and
/// magnitudes outside `[1e-4, 1e16)` switch to exponent form (`1e-07`,
/// `1.5e+16`).
pub fn format_amount(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return exponent_form(v);
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

/// `{:e}` with a signed, at least two-digit exponent.
fn exponent_form(v: f64) -> String {
    let sci = format!("{v:e}");
    match sci.split_once('e').map(|(m, e)| (m, e.parse::<i32>())) {
        Some((mantissa, Ok(exp))) => {
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        _ => sci,
    }
}

/// Aggregates computed once per run. A `None` label renders as
/// [`DATA_UNAVAILABLE`].
#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub total_sales: f64,
    pub best_selling_product: Option<String>,
    pub worst_selling_product: Option<String>,
    pub top_region: Option<String>,
}

impl Insights {
    pub fn value(&self, metric: Metric) -> InsightValue<'_> {
        match metric {
            Metric::TotalSales => InsightValue::Amount(self.total_sales),
            Metric::BestSellingProduct => label(&self.best_selling_product),
            Metric::WorstSellingProduct => label(&self.worst_selling_product),
            Metric::TopRegion => label(&self.top_region),
        }
    }

    /// Metric/Value pairs in report order, values rendered as text.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        Metric::ALL
            .iter()
            .map(|m| (m.as_str(), self.value(*m).to_string()))
            .collect()
    }
}

fn label(l: &Option<String>) -> InsightValue<'_> {
    InsightValue::Label(l.as_deref().unwrap_or(DATA_UNAVAILABLE))
}

#[derive(Clone, Copy)]
enum Extreme {
    Max,
    Min,
}

/// Sum Sales per label. BTreeMap keeps labels in ascending order.
fn grouped_sums<'a>(labels: &'a StringArray, sales: &Float64Array) -> BTreeMap<&'a str, f64> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for (label, amount) in labels.iter().zip(sales.iter()) {
        if let (Some(label), Some(amount)) = (label, amount) {
            *sums.entry(label).or_insert(0.0) += amount;
        }
    }
    sums
}

/// Label with the largest/smallest sum. On ties the first label in
/// ascending order wins.
fn pick(sums: &BTreeMap<&str, f64>, extreme: Extreme) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for (&label, &sum) in sums {
        let better = match (best, extreme) {
            (None, _) => true,
            (Some((_, cur)), Extreme::Max) => sum > cur,
            (Some((_, cur)), Extreme::Min) => sum < cur,
        };
        if better {
            best = Some((label, sum));
        }
    }
    best.map(|(label, _)| label.to_string())
}

fn group_extreme(table: &SalesTable, column: &str, extreme: Extreme) -> Option<String> {
    let labels = table.text_column(column)?;
    let sales = table.sales()?;
    pick(&grouped_sums(labels, sales), extreme)
}

/// Compute the four insights. Never fails: an empty table or an absent
/// grouping column yields the sentinel for that insight.
#[tracing::instrument(level = "info", skip_all, fields(rows = table.num_rows()))]
pub fn analyze(table: &SalesTable) -> Insights {
    let total_sales = table
        .sales()
        // fold from +0.0: an empty `sum()` of f64 is -0.0
        .map(|s| s.iter().flatten().fold(0.0, |acc, v| acc + v))
        .unwrap_or(0.0);

    let insights = Insights {
        total_sales,
        best_selling_product: group_extreme(table, PRODUCT, Extreme::Max),
        worst_selling_product: group_extreme(table, PRODUCT, Extreme::Min),
        top_region: group_extreme(table, REGION, Extreme::Max),
    };

    for (metric, value) in insights.rows() {
        info!(metric, %value, "insight");
    }
    insights
}
