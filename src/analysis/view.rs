//! Render-ready view model built from a nutrition record.

use serde::Serialize;
use std::fmt;

use super::nutrients::{top_nutrients_for, NutrientBar, DEFAULT_TOP_N};
use super::score_style::{nutri_score_message, style, ScoreStyle, ScoreType};
use crate::nutrition::{NutritionRecord, NOT_AVAILABLE};

pub const NO_INGREDIENTS: &str = "No ingredients information available.";
pub const CHART_TITLE: &str = "Top 10 Nutrients";
pub const CHART_DATASET_LABEL: &str = "Nutrients per 100g";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub title: &'static str,
    pub grade: String,
    pub style: ScoreStyle,
}

impl ScoreCard {
    fn new(score_type: ScoreType, grade: &str) -> Self {
        Self {
            title: score_type.title(),
            grade: grade.to_string(),
            style: style(score_type, grade),
        }
    }
}

/// One row of the full nutrient-level table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientLevel {
    pub label: String,
    pub display: String,
}

/// Horizontal bar chart of the most significant nutrients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientChart {
    pub title: &'static str,
    pub dataset_label: &'static str,
    pub bars: Vec<NutrientBar>,
}

impl NutrientChart {
    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.value).collect()
    }
}

/// Everything the analysis screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView {
    pub product_name: String,
    pub eco_score: ScoreCard,
    pub nutri_score: ScoreCard,
    pub ingredients: String,
    pub nutrient_levels: Vec<NutrientLevel>,
    pub chart: NutrientChart,
    pub quality_message: &'static str,
    /// Empty when the section is hidden
    pub warnings: Vec<String>,
    /// Absent when the section is hidden
    pub carbon_footprint: Option<String>,
}

impl AnalysisView {
    pub fn from_record(record: &NutritionRecord) -> Self {
        let product_name = non_blank(record.product_name.as_deref())
            .unwrap_or(NOT_AVAILABLE)
            .to_string();
        let ingredients = non_blank(record.ingredients.as_deref())
            .unwrap_or(NO_INGREDIENTS)
            .to_string();

        let nutrient_levels = record
            .nutritional_values
            .iter()
            .map(|(key, value)| NutrientLevel {
                label: key.replace('_', " "),
                display: value
                    .display_text()
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            })
            .collect();

        Self {
            product_name,
            eco_score: ScoreCard::new(ScoreType::Eco, &record.eco_score),
            nutri_score: ScoreCard::new(ScoreType::Nutri, &record.nutri_score),
            ingredients,
            nutrient_levels,
            chart: NutrientChart {
                title: CHART_TITLE,
                dataset_label: CHART_DATASET_LABEL,
                bars: top_nutrients_for(Some(record), DEFAULT_TOP_N),
            },
            quality_message: nutri_score_message(&record.nutri_score),
            warnings: record.low_nutrient_warnings.clone(),
            carbon_footprint: record
                .carbon_footprint
                .filter(|v| *v != 0.0 && v.is_finite())
                .map(|v| format!("{} g CO2 eq/100g", v)),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl fmt::Display for AnalysisView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Product: {}", self.product_name)?;
        for card in [&self.eco_score, &self.nutri_score] {
            writeln!(
                f,
                "{}: {} ({} on {})",
                card.title, card.grade, card.style.color, card.style.background_color
            )?;
        }
        writeln!(f, "Ingredients: {}", self.ingredients)?;

        writeln!(f, "Nutrient Levels:")?;
        for level in &self.nutrient_levels {
            writeln!(f, "  {}: {}", level.label, level.display)?;
        }

        writeln!(f, "{} ({}):", self.chart.title, self.chart.dataset_label)?;
        for bar in &self.chart.bars {
            writeln!(f, "  {:<24} {}", bar.label, bar.value)?;
        }

        writeln!(f, "{}", self.quality_message)?;

        if self.has_warnings() {
            writeln!(f, "Low Nutrient Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "  - {}", warning)?;
            }
        }
        if let Some(footprint) = &self.carbon_footprint {
            writeln!(f, "Carbon Footprint: {}", footprint)?;
        }
        Ok(())
    }
}
