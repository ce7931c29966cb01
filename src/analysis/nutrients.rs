//! Top-N nutrient ranking for the horizontal bar chart.

use serde::Serialize;

use crate::nutrition::NutritionRecord;

/// Number of bars shown by default
pub const DEFAULT_TOP_N: usize = 10;
/// Values at or below this amount per 100g are not charted
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.1;

/// One chart bar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientBar {
    pub label: String,
    pub value: f64,
}

/// Rank nutrient entries for charting
///
/// Keeps values strictly above [`SIGNIFICANCE_THRESHOLD`], sorts them by value
/// descending and truncates to `n`. The sort is stable: equal values keep the
/// order in which they were supplied. Labels have underscores replaced by
/// spaces.
///
/// ```rust
/// use nutricheck::analysis::nutrients::top_nutrients;
///
/// let bars = top_nutrients([("saturated_fat", Some(10.6)), ("salt", Some(0.1)), ("sugars", Some(56.3))], 10);
/// assert_eq!(bars.len(), 2);
/// assert_eq!(bars[0].label, "sugars");
/// assert_eq!(bars[1].label, "saturated fat");
/// ```
pub fn top_nutrients<I, K>(entries: I, n: usize) -> Vec<NutrientBar>
where
    I: IntoIterator<Item = (K, Option<f64>)>,
    K: AsRef<str>,
{
    let mut bars: Vec<NutrientBar> = entries
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| *v > SIGNIFICANCE_THRESHOLD)
                .map(|value| NutrientBar {
                    label: key.as_ref().replace('_', " "),
                    value,
                })
        })
        .collect();

    // NaN never passes the threshold filter, so total_cmp orders real numbers only
    bars.sort_by(|a, b| b.value.total_cmp(&a.value));
    bars.truncate(n);
    bars
}

/// [`top_nutrients`] over a record's nutrient map; no record means no bars
pub fn top_nutrients_for(record: Option<&NutritionRecord>, n: usize) -> Vec<NutrientBar> {
    match record {
        Some(record) => top_nutrients(
            record.nutritional_values.iter().map(|(k, v)| (k.as_str(), v.value)),
            n,
        ),
        None => Vec::new(),
    }
}
