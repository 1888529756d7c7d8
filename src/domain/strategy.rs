use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::config::FORM_DEFAULTS;
use crate::domain::named::Named;
use crate::domain::series::TimeSeriesTable;
use crate::utils::time_utils::{format_date, parse_date, subtract_days};

/// Name used for a lone strategy submitted without a comparison set.
pub const SINGLE_STRATEGY_NAME: &str = "default";

// ============================================================================
// Cadence
// ============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Frequency {
    Days,
    Weeks,
    Fortnights,
    #[default]
    Months,
    Quarters,
    Years,
}

// ============================================================================
// Parameter schema
// ============================================================================

/// Type tag of a strategy-specific parameter. Drives both the input widget and
/// the coercion applied before the request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ParameterKind {
    Integer,
    Number,
    Text,
}

impl From<String> for ParameterKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "integer" => ParameterKind::Integer,
            "number" => ParameterKind::Number,
            _ => ParameterKind::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ParameterKind,
    #[serde(default)]
    pub default: Value,
}

impl ParameterSpec {
    /// The default rendered as form text.
    pub fn default_text(&self) -> String {
        match &self.default {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Convert user text into the JSON type the backend expects.
    pub fn coerce(&self, raw: &str) -> Result<Value> {
        let text = raw.trim();
        match self.kind {
            ParameterKind::Integer => {
                // Fractional input is truncated, matching integer parsing on the form
                let value = match text.parse::<i64>() {
                    Ok(v) => v,
                    Err(_) => {
                        let float: f64 = text.parse().map_err(|_| {
                            anyhow!("'{}' expects an integer, got '{}'", self.label, raw)
                        })?;
                        if !float.is_finite() {
                            bail!("'{}' expects an integer, got '{}'", self.label, raw);
                        }
                        float.trunc() as i64
                    }
                };
                Ok(Value::Number(Number::from(value)))
            }
            ParameterKind::Number => {
                let float: f64 = text
                    .parse()
                    .map_err(|_| anyhow!("'{}' expects a number, got '{}'", self.label, raw))?;
                Number::from_f64(float)
                    .map(Value::Number)
                    .ok_or_else(|| anyhow!("'{}' must be a finite number", self.label))
            }
            ParameterKind::Text => Ok(Value::String(raw.to_string())),
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyDefinition {
    pub key: String,
    pub display_name: String,
    pub parameters: Vec<ParameterSpec>,
}

/// Response of the strategy listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategiesResponse {
    pub strategies: Named<Vec<ParameterSpec>>,
}

impl StrategiesResponse {
    pub fn into_catalog(self) -> StrategyCatalog {
        StrategyCatalog::from_schemas(self.strategies)
    }
}

/// Known strategies in backend order, keyed by identifier (e.g. `BearDripFeed`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyCatalog {
    strategies: Named<StrategyDefinition>,
}

impl StrategyCatalog {
    pub fn from_schemas(schemas: Named<Vec<ParameterSpec>>) -> Self {
        let strategies = schemas
            .iter()
            .map(|(key, parameters)| {
                let definition = StrategyDefinition {
                    key: key.to_string(),
                    display_name: display_name_from_key(key),
                    parameters: parameters.clone(),
                };
                (key.to_string(), definition)
            })
            .collect();
        Self { strategies }
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn get(&self, key: &str) -> Option<&StrategyDefinition> {
        self.strategies.get(key)
    }

    pub fn first_key(&self) -> Option<&str> {
        self.strategies.first().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StrategyDefinition> {
        self.strategies.values()
    }

    /// Defaults for every parameter of every strategy, as form text.
    pub fn default_parameters(&self) -> BTreeMap<String, String> {
        self.iter()
            .flat_map(|def| def.parameters.iter())
            .map(|spec| (spec.name.clone(), spec.default_text()))
            .collect()
    }

    /// Parameters of `key` grouped into rows of `columns` for the form grid.
    pub fn parameter_rows(&self, key: &str, columns: usize) -> Vec<&[ParameterSpec]> {
        self.get(key)
            .map(|def| split_into_columns(&def.parameters, columns))
            .unwrap_or_default()
    }
}

/// Split a concatenated identifier into words at capital and digit boundaries:
/// `MovingAverage` -> `Moving Average`, `RSI14Dip` -> `RSI 14 Dip`.
pub fn display_name_from_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let run_end = |start: usize, pred: fn(&char) -> bool| {
        start + chars[start..].iter().take_while(|c| pred(c)).count()
    };

    let mut words: Vec<String> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let end = if c.is_ascii_uppercase() {
            let upper_end = run_end(i, char::is_ascii_uppercase);
            let followed_by_lower = chars.get(upper_end).is_some_and(char::is_ascii_lowercase);
            match (followed_by_lower, upper_end - i) {
                // Acronym directly before a capitalised word: "RSIDip" -> "RSI", "Dip"
                (true, n) if n > 1 => upper_end - 1,
                (true, _) => run_end(upper_end, char::is_ascii_lowercase),
                (false, _) => upper_end,
            }
        } else if c.is_ascii_lowercase() {
            run_end(i, char::is_ascii_lowercase)
        } else if c.is_ascii_digit() {
            run_end(i, char::is_ascii_digit)
        } else {
            i += 1;
            continue;
        };
        words.push(chars[i..end].iter().collect());
        i = end;
    }
    words.join(" ")
}

/// Group items into rows of at most `columns` (5 items, 2 columns -> 2, 2, 1).
pub fn split_into_columns<T>(items: &[T], columns: usize) -> Vec<&[T]> {
    items.chunks(columns.max(1)).collect()
}

// ============================================================================
// Form state
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyForm {
    pub initial_investment: f64,
    pub regular_investment: f64,
    pub regular_investment_frequency: Frequency,
    pub strategy: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Strategy-specific parameters as entered (text), keyed by parameter name.
    pub parameters: BTreeMap<String, String>,
}

impl Default for StrategyForm {
    fn default() -> Self {
        Self {
            initial_investment: FORM_DEFAULTS.initial_investment,
            regular_investment: FORM_DEFAULTS.regular_investment,
            regular_investment_frequency: FORM_DEFAULTS.frequency,
            strategy: None,
            start_date: None,
            parameters: BTreeMap::new(),
        }
    }
}

impl StrategyForm {
    /// Fresh form pointing at the first catalog strategy with all defaults filled in.
    pub fn with_catalog(catalog: &StrategyCatalog, start_date: Option<NaiveDate>) -> Self {
        Self {
            strategy: catalog.first_key().map(str::to_string),
            start_date,
            parameters: catalog.default_parameters(),
            ..Self::default()
        }
    }

    /// The cadence only matters once a strategy is picked and money is added regularly.
    pub fn frequency_enabled(&self) -> bool {
        self.strategy.is_some() && self.regular_investment != 0.0
    }

    pub fn parameter_text(&self, spec: &ParameterSpec) -> String {
        self.parameters
            .get(&spec.name)
            .cloned()
            .unwrap_or_else(|| spec.default_text())
    }

    /// One `strategy` entry of the submission body, parameters coerced to their declared type.
    pub fn to_request_entry(&self, catalog: &StrategyCatalog) -> Result<Map<String, Value>> {
        let key = self
            .strategy
            .as_deref()
            .ok_or_else(|| anyhow!("no strategy selected"))?;
        let definition = catalog
            .get(key)
            .ok_or_else(|| anyhow!("unknown strategy '{}'", key))?;
        let start_date = self
            .start_date
            .ok_or_else(|| anyhow!("no start date selected"))?;

        let mut entry = Map::new();
        entry.insert("initial_investment".into(), json_number(self.initial_investment)?);
        entry.insert("regular_investment".into(), json_number(self.regular_investment)?);
        entry.insert(
            "regular_investment_frequency".into(),
            Value::String(self.regular_investment_frequency.to_string()),
        );
        entry.insert("strategy".into(), Value::String(key.to_string()));
        entry.insert("start_date".into(), Value::String(format_date(start_date)));

        for spec in &definition.parameters {
            let value = spec
                .coerce(&self.parameter_text(spec))
                .with_context(|| format!("strategy {}", definition.display_name))?;
            entry.insert(spec.name.clone(), value);
        }
        Ok(entry)
    }
}

fn json_number(value: f64) -> Result<Value> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| anyhow!("amount must be a finite number"))
}

/// Earliest and latest selectable start date for a price history.
/// The last day is excluded so a strategy always covers at least one step.
pub fn start_date_bounds(table: &TimeSeriesTable) -> Option<(NaiveDate, NaiveDate)> {
    let earliest = table.first_date()?;
    let latest = subtract_days(table.last_date()?, 1).max(earliest);
    Some((earliest, latest))
}

// ============================================================================
// Comparison set
// ============================================================================

/// Strategy forms queued for a side-by-side run, named `<Strategy>_<n>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonSet {
    forms: Named<StrategyForm>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn get(&self, name: &str) -> Option<&StrategyForm> {
        self.forms.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.forms.names()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StrategyForm)> {
        self.forms.iter()
    }

    /// Add a copy of `form` and return the name it was stored under.
    pub fn add(&mut self, form: StrategyForm) -> Result<String> {
        let key = form
            .strategy
            .clone()
            .ok_or_else(|| anyhow!("pick a strategy before adding it to the comparison"))?;

        let last_instance = self
            .forms
            .iter()
            .filter(|(_, existing)| existing.strategy.as_deref() == Some(key.as_str()))
            .filter_map(|(name, _)| name.rsplit('_').next()?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);

        let name = format!("{}_{}", key, last_instance + 1);
        self.forms.insert(name.clone(), form);
        Ok(name)
    }

    /// Overwrite an existing entry. Returns `false` if `name` is unknown.
    pub fn update(&mut self, name: &str, form: StrategyForm) -> bool {
        if !self.forms.contains(name) {
            return false;
        }
        self.forms.insert(name, form);
        true
    }

    pub fn remove(&mut self, name: &str) -> Option<StrategyForm> {
        self.forms.remove(name)
    }
}

// ============================================================================
// Submission body
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyRequest {
    pub strategy: Named<Map<String, Value>>,
    pub ticker: String,
}

impl StrategyRequest {
    pub fn from_form(form: &StrategyForm, catalog: &StrategyCatalog, ticker: &str) -> Result<Self> {
        let mut strategy = Named::new();
        strategy.insert(SINGLE_STRATEGY_NAME, form.to_request_entry(catalog)?);
        Ok(Self {
            strategy,
            ticker: ticker.to_string(),
        })
    }

    pub fn from_comparisons(
        set: &ComparisonSet,
        catalog: &StrategyCatalog,
        ticker: &str,
    ) -> Result<Self> {
        if set.is_empty() {
            bail!("comparison set is empty");
        }
        let mut strategy = Named::new();
        for (name, form) in set.iter() {
            let entry = form
                .to_request_entry(catalog)
                .with_context(|| format!("comparison entry {}", name))?;
            strategy.insert(name, entry);
        }
        Ok(Self {
            strategy,
            ticker: ticker.to_string(),
        })
    }
}

// ============================================================================
// Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrategySummary {
    pub total_invested: f64,
    pub returns: f64,
    pub percentage_returns: f64,
    #[serde(default)]
    pub value: Option<f64>,
    /// `[start, end]` as ISO timestamps.
    #[serde(default)]
    pub investment_date: Vec<String>,
    pub investment_time_days: i64,
}

impl StrategySummary {
    /// First investment date; tolerates full timestamps such as `2020-01-02T00:00:00-05:00`.
    pub fn start_date(&self) -> Option<NaiveDate> {
        let first = self.investment_date.first()?;
        parse_date(first.get(..10).unwrap_or(first)).ok()
    }
}

/// One simulated strategy: per-day table plus its summary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrategyResult {
    pub data: TimeSeriesTable,
    pub summary: StrategySummary,
}

/// Named results of one submission, in response order.
pub type StrategyComparison = Named<StrategyResult>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::format_duration;
    use serde_json::json;
    use strum::IntoEnumIterator;

    fn catalog() -> StrategyCatalog {
        let json = r#"{"strategies": {
            "RegularInvestment": [],
            "BearDripFeed": [
                {"name": "number_down_periods", "label": "Down periods", "type": "integer", "default": 3},
                {"name": "drip_ratio", "label": "Drip ratio", "type": "number", "default": 0.5},
                {"name": "mode", "label": "Mode", "type": "select", "default": "fast"}
            ]
        }}"#;
        serde_json::from_str::<StrategiesResponse>(json).unwrap().into_catalog()
    }

    fn d(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    #[test]
    fn display_names_split_on_boundaries() {
        assert_eq!(display_name_from_key("MovingAverage"), "Moving Average");
        assert_eq!(display_name_from_key("BearDripFeed"), "Bear Drip Feed");
        assert_eq!(display_name_from_key("RSI14Dip"), "RSI 14 Dip");
        assert_eq!(display_name_from_key("RSIDip"), "RSI Dip");
        assert_eq!(display_name_from_key("VelocityMax2"), "Velocity Max 2");
    }

    #[test]
    fn catalog_keeps_backend_order_and_defaults() {
        let catalog = catalog();
        assert_eq!(catalog.first_key(), Some("RegularInvestment"));
        assert_eq!(catalog.get("BearDripFeed").unwrap().display_name, "Bear Drip Feed");

        let defaults = catalog.default_parameters();
        assert_eq!(defaults["number_down_periods"], "3");
        assert_eq!(defaults["drip_ratio"], "0.5");
        assert_eq!(defaults["mode"], "fast");

        let rows = catalog.parameter_rows("BearDripFeed", 2);
        assert_eq!(rows.iter().map(|r| r.len()).collect::<Vec<_>>(), vec![2, 1]);
        assert!(catalog.parameter_rows("Missing", 2).is_empty());
    }

    #[test]
    fn parameters_are_coerced_to_their_type() {
        let catalog = catalog();
        let mut form = StrategyForm::with_catalog(&catalog, Some(d("2020-01-01")));
        form.strategy = Some("BearDripFeed".into());
        form.parameters.insert("number_down_periods".into(), "5.9".into());
        form.parameters.insert("drip_ratio".into(), "0.25".into());

        let entry = form.to_request_entry(&catalog).unwrap();
        assert_eq!(entry["number_down_periods"], json!(5));
        assert_eq!(entry["drip_ratio"], json!(0.25));
        assert_eq!(entry["mode"], json!("fast"));
        assert_eq!(entry["initial_investment"], json!(1000.0));
        assert_eq!(entry["regular_investment_frequency"], json!("months"));
        assert_eq!(entry["start_date"], json!("2020-01-01"));
        assert_eq!(entry["strategy"], json!("BearDripFeed"));
    }

    #[test]
    fn bad_numeric_input_is_rejected() {
        let catalog = catalog();
        let mut form = StrategyForm::with_catalog(&catalog, Some(d("2020-01-01")));
        form.strategy = Some("BearDripFeed".into());
        form.parameters.insert("drip_ratio".into(), "lots".into());
        assert!(form.to_request_entry(&catalog).is_err());

        form.strategy = None;
        assert!(form.to_request_entry(&catalog).is_err());
    }

    #[test]
    fn comparison_names_increment_per_strategy() {
        let catalog = catalog();
        let mut set = ComparisonSet::new();
        let mut form = StrategyForm::with_catalog(&catalog, Some(d("2020-01-01")));

        assert_eq!(set.add(form.clone()).unwrap(), "RegularInvestment_1");
        assert_eq!(set.add(form.clone()).unwrap(), "RegularInvestment_2");
        form.strategy = Some("BearDripFeed".into());
        assert_eq!(set.add(form.clone()).unwrap(), "BearDripFeed_1");

        set.remove("RegularInvestment_1");
        assert_eq!(set.add(StrategyForm::with_catalog(&catalog, None)).unwrap(), "RegularInvestment_3");

        form.initial_investment = 5.0;
        assert!(set.update("BearDripFeed_1", form.clone()));
        assert_eq!(set.get("BearDripFeed_1").unwrap().initial_investment, 5.0);
        assert!(!set.update("Nope_1", form));

        assert!(set.add(StrategyForm::default()).is_err());
    }

    #[test]
    fn request_body_shape() {
        let catalog = catalog();
        let form = StrategyForm::with_catalog(&catalog, Some(d("2021-06-01")));
        let request = StrategyRequest::from_form(&form, &catalog, "MSFT").unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["ticker"], json!("MSFT"));
        assert_eq!(body["strategy"]["default"]["strategy"], json!("RegularInvestment"));

        let mut set = ComparisonSet::new();
        set.add(form.clone()).unwrap();
        set.add(form).unwrap();
        let request = StrategyRequest::from_comparisons(&set, &catalog, "MSFT").unwrap();
        assert_eq!(
            request.strategy.names().collect::<Vec<_>>(),
            vec!["RegularInvestment_1", "RegularInvestment_2"]
        );
        assert!(StrategyRequest::from_comparisons(&ComparisonSet::new(), &catalog, "MSFT").is_err());
    }

    #[test]
    fn monthly_strategy_result_reports_duration() {
        let json = r#"{
            "MonthlyDca_1": {
                "summary": {"investment_date": ["2020-01-02T00:00:00-05:00", "2023-11-02T00:00:00-04:00"],
                            "investment_time_days": 1400, "total_invested": 5600.0,
                            "value": 7000.0, "returns": 1400.0, "percentage_returns": 25.0},
                "data": {"Date": ["2020-01-02", "2020-01-03"], "Open": [10.0, 11.0],
                         "investment": [1000.0, 0.0]}
            }
        }"#;
        let results: StrategyComparison = serde_json::from_str(json).unwrap();
        let (name, result) = results.first().unwrap();

        assert_eq!(name, "MonthlyDca_1");
        assert_eq!(result.summary.start_date(), Some(d("2020-01-02")));
        assert_eq!(format_duration(result.summary.investment_time_days), "3Y 9M");
    }

    #[test]
    fn start_date_bounds_exclude_last_day() {
        let table = TimeSeriesTable::from_columns(
            vec![d("2020-01-01"), d("2020-03-01")],
            [("Open", vec![1.0, 2.0])],
        )
        .unwrap();
        assert_eq!(start_date_bounds(&table), Some((d("2020-01-01"), d("2020-02-29"))));
    }

    #[test]
    fn frequencies_serialise_lowercase() {
        let names: Vec<String> = Frequency::iter().map(|f| f.to_string()).collect();
        assert_eq!(names, ["days", "weeks", "fortnights", "months", "quarters", "years"]);
        assert_eq!(serde_json::to_value(Frequency::Quarters).unwrap(), json!("quarters"));
        assert!(!StrategyForm { regular_investment: 0.0, ..StrategyForm::default() }.frequency_enabled());
    }
}
