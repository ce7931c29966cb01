//! # NutriCheck
//!
//! Identifies a packaged food product from a camera frame, an uploaded
//! image or a spoken name, gates the name behind an explicit confirmation
//! and turns the product lookup into a render-ready nutrition analysis.

pub mod analysis;
pub mod circuit_breaker;
pub mod config;
pub mod errors;
pub mod image_codec;
pub mod nutrition;
pub mod observability;
pub mod observability_config;
pub mod service_config;
pub mod service_errors;
pub mod services;
pub mod workflow;

// Re-export types for easier access
pub use analysis::AnalysisView;
pub use config::AppConfig;
pub use errors::{AppError, AppResult};
pub use nutrition::NutritionRecord;
pub use workflow::{Outcome, Phase, Workflow};
