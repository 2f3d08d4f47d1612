// src/models.rs
use serde::{Deserialize, Serialize};

/// The four maturity/health labels the remote classifier knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaturityClass {
    Unripe,
    PartiallyRipe,
    Ripe,
    Disease,
}

impl MaturityClass {
    pub const ALL: [MaturityClass; 4] = [
        MaturityClass::Unripe,
        MaturityClass::PartiallyRipe,
        MaturityClass::Ripe,
        MaturityClass::Disease,
    ];

    /// The label exactly as the service sends it.
    pub fn wire_label(self) -> &'static str {
        match self {
            MaturityClass::Unripe => "Unripe",
            MaturityClass::PartiallyRipe => "Partially Ripe",
            MaturityClass::Ripe => "Ripe",
            MaturityClass::Disease => "Disease",
        }
    }

    pub fn from_wire_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.wire_label() == label)
    }
}

/// What the service predicted; labels outside the known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictedClass {
    Known(MaturityClass),
    Unrecognized(String),
}

impl PredictedClass {
    pub fn from_label(label: &str) -> Self {
        match MaturityClass::from_wire_label(label) {
            Some(class) => PredictedClass::Known(class),
            None => PredictedClass::Unrecognized(label.to_string()),
        }
    }

    pub fn raw_label(&self) -> &str {
        match self {
            PredictedClass::Known(class) => class.wire_label(),
            PredictedClass::Unrecognized(label) => label,
        }
    }
}

impl Serialize for PredictedClass {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.raw_label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassConfidence {
    pub label: PredictedClass,
    pub percent: f64,
}

/// A successful classification, as the rest of the crate sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub predicted_class: PredictedClass,
    pub confidence: Option<f64>,
    /// Server order is preserved.
    pub all_confidences: Vec<ClassConfidence>,
    /// Base64 PNG without a data-URI prefix.
    pub annotated_image: Option<String>,
    pub classified_at: String,
    pub latency_ms: u64,
}

/// `confidence` arrives as a number from one deployment and a string from the other.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Percentage {
    Number(f64),
    Text(String),
}

impl Percentage {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Percentage::Number(n) => Some(*n),
            Percentage::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

/// JSON body returned by `POST /predicted/`.
#[derive(Deserialize, Debug, Default)]
pub struct PredictionResponse {
    #[serde(default)]
    pub predicted_class: Option<String>,
    #[serde(default)]
    pub confidence: Option<Percentage>,
    #[serde(default)]
    pub annotated_image: Option<String>,
    #[serde(default)]
    pub all_confidences: Option<serde_json::Map<String, serde_json::Value>>,
    /// Any truthy value here means the service gave up on the image.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl PredictionResponse {
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_labels_round_trip_for_known_classes() {
        for class in MaturityClass::ALL {
            assert_eq!(MaturityClass::from_wire_label(class.wire_label()), Some(class));
        }
        assert_eq!(MaturityClass::from_wire_label("partially ripe"), None);
    }

    #[test]
    fn test_unrecognized_label_is_kept() {
        let class = PredictedClass::from_label("Overripe");
        assert_eq!(class, PredictedClass::Unrecognized("Overripe".to_string()));
        assert_eq!(class.raw_label(), "Overripe");
        assert_eq!(serde_json::to_value(&class).unwrap(), json!("Overripe"));
    }

    #[test]
    fn test_percentage_coercion() {
        assert_eq!(Percentage::Number(87.5).as_f64(), Some(87.5));
        assert_eq!(Percentage::Text("87.5".into()).as_f64(), Some(87.5));
        assert_eq!(Percentage::Text(" 12 ".into()).as_f64(), Some(12.0));
        assert_eq!(Percentage::Text("high".into()).as_f64(), None);
        assert_eq!(Percentage::Text("NaN".into()).as_f64(), None);
    }

    #[test]
    fn test_response_accepts_both_payload_shapes() {
        let with_confidence: PredictionResponse = serde_json::from_value(json!({
            "predicted_class": "Ripe",
            "confidence": "87.5"
        }))
        .unwrap();
        assert_eq!(with_confidence.confidence, Some(Percentage::Text("87.5".into())));
        assert!(with_confidence.all_confidences.is_none());

        let with_breakdown: PredictionResponse = serde_json::from_value(json!({
            "predicted_class": "Disease",
            "all_confidences": {"Disease": 91.0, "Ripe": 9.0},
            "annotated_image": "iVBORw0KGgo="
        }))
        .unwrap();
        assert!(with_breakdown.confidence.is_none());
        let keys: Vec<&String> = with_breakdown.all_confidences.as_ref().unwrap().keys().collect();
        assert_eq!(keys, ["Disease", "Ripe"]);
    }

    #[test]
    fn test_error_field_truthiness() {
        let parse = |v: serde_json::Value| -> Option<String> {
            serde_json::from_value::<PredictionResponse>(v).unwrap().error_message()
        };
        assert_eq!(parse(json!({"error": "No mango detected"})).as_deref(), Some("No mango detected"));
        assert_eq!(parse(json!({"error": ""})), None);
        assert_eq!(parse(json!({"error": null})), None);
        assert_eq!(parse(json!({"predicted_class": "Ripe"})), None);
        assert_eq!(parse(json!({"error": {"code": 3}})).as_deref(), Some("{\"code\":3}"));
    }
}
