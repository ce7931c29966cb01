//! Grade-to-colour mapping for the eco-score and nutri-score cards.
//!
//! Lookups never fail: `"N/A"`, lower-case letters and anything outside
//! A–E all resolve to [`FALLBACK_STYLE`].

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which score a grade belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreType {
    Eco,
    Nutri,
}

impl ScoreType {
    pub fn title(self) -> &'static str {
        match self {
            ScoreType::Eco => "Eco-Score",
            ScoreType::Nutri => "Nutri-Score",
        }
    }
}

impl FromStr for ScoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eco" | "ecoscore" | "eco-score" | "eco_score" => Ok(ScoreType::Eco),
            "nutri" | "nutriscore" | "nutri-score" | "nutri_score" => Ok(ScoreType::Nutri),
            other => Err(format!("unknown score type: {}", other)),
        }
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Foreground/background colour pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStyle {
    pub color: &'static str,
    pub background_color: &'static str,
}

impl ScoreStyle {
    const fn new(color: &'static str, background_color: &'static str) -> Self {
        Self {
            color,
            background_color,
        }
    }
}

/// Style for "N/A" and unknown grades
pub const FALLBACK_STYLE: ScoreStyle = ScoreStyle::new("#767676", "#e0e0e0");

lazy_static! {
    static ref STYLES: HashMap<ScoreType, HashMap<&'static str, ScoreStyle>> = {
        let eco = HashMap::from([
            ("A", ScoreStyle::new("#1a9641", "#b8e186")),
            ("B", ScoreStyle::new("#55a867", "#ddecb8")),
            ("C", ScoreStyle::new("#a6d96a", "#f1faee")),
            ("D", ScoreStyle::new("#fdae61", "#fee08b")),
            ("E", ScoreStyle::new("#d7191c", "#fdae61")),
        ]);
        let nutri = HashMap::from([
            ("A", ScoreStyle::new("#006837", "#a6d96a")),
            ("B", ScoreStyle::new("#1a9850", "#d9ef8b")),
            ("C", ScoreStyle::new("#66bd63", "#fee08b")),
            ("D", ScoreStyle::new("#fdae61", "#fdae61")),
            ("E", ScoreStyle::new("#d73027", "#f46d43")),
        ]);
        HashMap::from([(ScoreType::Eco, eco), (ScoreType::Nutri, nutri)])
    };
}

/// Display style for a grade of the given score type
pub fn style(score_type: ScoreType, grade: &str) -> ScoreStyle {
    STYLES
        .get(&score_type)
        .and_then(|grades| grades.get(grade))
        .copied()
        .unwrap_or(FALLBACK_STYLE)
}

/// Short verdict shown under the nutri-score card
pub fn nutri_score_message(grade: &str) -> &'static str {
    match grade {
        "A" => "This product has an excellent nutritional quality. Enjoy without hesitation!",
        "B" | "C" => "This product has a good nutritional quality. Consume in moderation as part of a balanced diet.",
        "D" | "E" => "This product has a poor nutritional quality. It's advisable to limit its consumption and look for healthier alternatives.",
        _ => "Nutritional information is not available for this product.",
    }
}
