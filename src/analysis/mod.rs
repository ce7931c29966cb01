//! Derived analysis of a nutrition record: nutrient ranking, score styling
//! and the render-ready view model.

pub mod nutrients;
pub mod score_style;
pub mod view;

pub use nutrients::{top_nutrients, top_nutrients_for, NutrientBar, DEFAULT_TOP_N};
pub use score_style::{nutri_score_message, style, ScoreStyle, ScoreType, FALLBACK_STYLE};
pub use view::{AnalysisView, NutrientChart, NutrientLevel, ScoreCard};
