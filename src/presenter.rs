// src/presenter.rs
//! Display metadata for predicted classes.
//!
//! Label, color and recommendation live in one table so they cannot drift apart.

use serde::Serialize;

use crate::models::{ClassificationResult, MaturityClass, PredictedClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorToken {
    Unripe,
    PartiallyRipe,
    Ripe,
    Disease,
    Neutral,
}

impl ColorToken {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorToken::Unripe => "unripe",
            ColorToken::PartiallyRipe => "partially-ripe",
            ColorToken::Ripe => "ripe",
            ColorToken::Disease => "disease",
            ColorToken::Neutral => "neutral",
        }
    }

    /// Hex swatch the embedded form paints badges and bars with.
    pub fn swatch(self) -> &'static str {
        match self {
            ColorToken::Unripe => "#65a30d",
            ColorToken::PartiallyRipe => "#eab308",
            ColorToken::Ripe => "#f97316",
            ColorToken::Disease => "#dc2626",
            ColorToken::Neutral => "#9ca3af",
        }
    }
}

pub struct ClassProfile {
    pub class: MaturityClass,
    pub label: &'static str,
    pub color: ColorToken,
    pub recommendation: &'static str,
}

pub const UNKNOWN_RECOMMENDATION: &str =
    "Unknown result. Please recheck the image or handle manually.";

static PROFILES: [ClassProfile; 4] = [
    ClassProfile {
        class: MaturityClass::Unripe,
        label: "Unripe",
        color: ColorToken::Unripe,
        recommendation: "Mango is not yet ripe: store in a cool area for 2-3 days before drying to enhance flavor.",
    },
    ClassProfile {
        class: MaturityClass::PartiallyRipe,
        label: "Partially Ripe",
        color: ColorToken::PartiallyRipe,
        recommendation: "Partially ripe mango: suitable for pre-processing but should be sorted again before drying.",
    },
    ClassProfile {
        class: MaturityClass::Ripe,
        label: "Ripe",
        color: ColorToken::Ripe,
        recommendation: "Ripe mango: ready for slicing and drying. Recommended to process within 24h for best quality.",
    },
    ClassProfile {
        class: MaturityClass::Disease,
        label: "Disease",
        color: ColorToken::Disease,
        recommendation: "Mangoes showing signs of disease: should be removed immediately to avoid affecting the entire production process.",
    },
];

pub fn profile(class: MaturityClass) -> &'static ClassProfile {
    let row = match class {
        MaturityClass::Unripe => 0,
        MaturityClass::PartiallyRipe => 1,
        MaturityClass::Ripe => 2,
        MaturityClass::Disease => 3,
    };
    &PROFILES[row]
}

pub fn display_label(class: &PredictedClass) -> &str {
    match class {
        PredictedClass::Known(known) => profile(*known).label,
        PredictedClass::Unrecognized(raw) => raw,
    }
}

pub fn color_token(class: &PredictedClass) -> ColorToken {
    match class {
        PredictedClass::Known(known) => profile(*known).color,
        PredictedClass::Unrecognized(_) => ColorToken::Neutral,
    }
}

pub fn recommendation(class: &PredictedClass) -> &'static str {
    match class {
        PredictedClass::Known(known) => profile(*known).recommendation,
        PredictedClass::Unrecognized(_) => UNKNOWN_RECOMMENDATION,
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProbabilityRow {
    pub label: String,
    pub color: ColorToken,
    pub swatch: &'static str,
    pub percent: f64,
    pub percent_text: String,
    /// Bar width, clamped to 0..=100.
    pub bar_width: f64,
}

/// Everything the results panel needs, already resolved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResultView {
    pub label: String,
    pub color: ColorToken,
    pub swatch: &'static str,
    pub recommendation: &'static str,
    pub confidence: Option<f64>,
    pub confidence_text: Option<String>,
    pub probabilities: Vec<ProbabilityRow>,
    pub annotated_image_uri: Option<String>,
    pub classified_at: String,
    pub latency_ms: u64,
}

pub fn present(result: &ClassificationResult) -> ResultView {
    let color = color_token(&result.predicted_class);
    let probabilities = result
        .all_confidences
        .iter()
        .map(|entry| {
            let color = color_token(&entry.label);
            ProbabilityRow {
                label: display_label(&entry.label).to_string(),
                color,
                swatch: color.swatch(),
                percent: entry.percent,
                percent_text: format_percent(entry.percent),
                bar_width: entry.percent.clamp(0.0, 100.0),
            }
        })
        .collect();

    ResultView {
        label: display_label(&result.predicted_class).to_string(),
        color,
        swatch: color.swatch(),
        recommendation: recommendation(&result.predicted_class),
        confidence: result.confidence,
        confidence_text: result.confidence.map(format_percent),
        probabilities,
        annotated_image_uri: result
            .annotated_image
            .as_deref()
            .filter(|b64| !b64.is_empty())
            .map(|b64| format!("data:image/png;base64,{}", b64)),
        classified_at: result.classified_at.clone(),
        latency_ms: result.latency_ms,
    }
}
