use anyhow::{Result, anyhow, bail};
use colorgrad::{Gradient, GradientBuilder, LinearGradient};
use strum_macros::{Display, EnumIter};

use crate::config::PLOT_CONFIG;
use crate::domain::strategy::{StrategyComparison, StrategySummary};
use crate::utils::maths_utils::{get_min_max, mean, scale_unit};

/// Summary columns that get a colour-coded cell in the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum SummaryMetric {
    #[strum(to_string = "Total Invested")]
    TotalInvested,
    #[strum(to_string = "Returns")]
    Returns,
    #[strum(to_string = "% Returns")]
    PercentageReturns,
}

impl SummaryMetric {
    /// Spending less for the same outcome ranks better.
    pub fn lower_is_better(self) -> bool {
        matches!(self, SummaryMetric::TotalInvested)
    }

    pub fn value(self, summary: &StrategySummary) -> f64 {
        match self {
            SummaryMetric::TotalInvested => summary.total_invested,
            SummaryMetric::Returns => summary.returns,
            SummaryMetric::PercentageReturns => summary.percentage_returns,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Min / max / mean of one summary metric across every strategy in the comparison.
pub fn compute_summary_range(
    results: &StrategyComparison,
    metric: SummaryMetric,
) -> Result<SummaryRange> {
    if results.is_empty() {
        bail!("cannot summarise an empty comparison");
    }
    let values: Vec<f64> = results
        .values()
        .map(|result| metric.value(&result.summary))
        .collect();

    let (min, max) = get_min_max(&values);
    Ok(SummaryRange {
        min,
        max,
        mean: mean(&values),
    })
}

/// The three colour-coded ranges, computed together whenever results change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRanges {
    pub total_invested: SummaryRange,
    pub returns: SummaryRange,
    pub percentage_returns: SummaryRange,
}

impl SummaryRanges {
    pub fn from_results(results: &StrategyComparison) -> Result<Self> {
        Ok(Self {
            total_invested: compute_summary_range(results, SummaryMetric::TotalInvested)?,
            returns: compute_summary_range(results, SummaryMetric::Returns)?,
            percentage_returns: compute_summary_range(results, SummaryMetric::PercentageReturns)?,
        })
    }

    pub fn get(&self, metric: SummaryMetric) -> SummaryRange {
        match metric {
            SummaryMetric::TotalInvested => self.total_invested,
            SummaryMetric::Returns => self.returns,
            SummaryMetric::PercentageReturns => self.percentage_returns,
        }
    }
}

// ============================================================================
// ColorScale
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellColor {
    /// No background: every strategy scored the same.
    Neutral,
    Rgba([u8; 4]),
}

/// Worst-to-best gradient over a summary range.
pub struct ColorScale {
    gradient: LinearGradient,
    range: SummaryRange,
    reverse: bool,
}

impl ColorScale {
    pub fn new(range: SummaryRange, reverse: bool) -> Result<Self> {
        let gradient = GradientBuilder::new()
            .html_colors(PLOT_CONFIG.summary_gradient_colors)
            .build::<LinearGradient>()
            .map_err(|e| anyhow!("invalid summary gradient: {}", e))?;
        Ok(Self {
            gradient,
            range,
            reverse,
        })
    }

    pub fn for_metric(ranges: &SummaryRanges, metric: SummaryMetric) -> Result<Self> {
        Self::new(ranges.get(metric), metric.lower_is_better())
    }

    /// Cell colour for `value`. Reversed scales mirror the value inside the
    /// range, so the lowest value gets the "best" end of the gradient.
    pub fn color_for(&self, value: f64) -> CellColor {
        let SummaryRange { min, max, .. } = self.range;
        if min == max {
            return CellColor::Neutral;
        }
        let x = if self.reverse { max - value + min } else { value };
        let t = scale_unit(x, min, max).clamp(0.0, 1.0);
        CellColor::Rgba(self.gradient.at(t as f32).to_rgba8())
    }
}
