use serde::{Serialize, Serializer};
use std::fmt;

/// Attached to every response, success or failure.
pub const DISCLAIMER: &str = "Disclaimer: This AI advice is for informational purposes only and is not a substitute for professional medical advice, diagnosis, or treatment. Always seek the advice of a qualified healthcare provider for any medical concerns.";

/// A complaint as received at the boundary.
#[derive(Debug, Clone, Default)]
pub struct DiagnosisRequest {
    pub problem_text: String,
    pub image_bytes: Option<Vec<u8>>,
}

impl DiagnosisRequest {
    pub fn new(problem_text: impl Into<String>, image_bytes: Option<Vec<u8>>) -> Self {
        Self {
            problem_text: problem_text.into(),
            // An empty file part means nothing was chosen.
            image_bytes: image_bytes.filter(|bytes| !bytes.is_empty()),
        }
    }

    pub fn has_text(&self) -> bool {
        !self.problem_text.is_empty()
    }

    pub fn has_image(&self) -> bool {
        self.image_bytes.as_ref().is_some_and(|bytes| !bytes.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        !self.has_text() && !self.has_image()
    }
}

/// Urgency tier reported to the client.
///
/// `Reported` carries a label taken verbatim from a structured model reply
/// that is not one of the canonical tiers (e.g. `"Basic/Minor"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Basic,
    Moderate,
    Severe,
    Blocked,
    Error,
    Unknown,
    Reported(String),
}

impl Severity {
    /// Maps a label to a tier without altering it: `as_str` always returns
    /// the input unchanged.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Basic" => Severity::Basic,
            "Moderate" => Severity::Moderate,
            "Severe" => Severity::Severe,
            "Blocked" => Severity::Blocked,
            "Error" => Severity::Error,
            "Unknown" => Severity::Unknown,
            other => Severity::Reported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Basic => "Basic",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
            Severity::Blocked => "Blocked",
            Severity::Error => "Error",
            Severity::Unknown => "Unknown",
            Severity::Reported(label) => label,
        }
    }

    /// Bounded label set for metrics.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Severity::Basic => "basic",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::Blocked => "blocked",
            Severity::Error => "error",
            Severity::Unknown => "unknown",
            Severity::Reported(_) => "reported",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The only shape ever sent back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisResult {
    pub severity: Severity,
    pub advice: String,
    disclaimer: &'static str,
}

impl DiagnosisResult {
    pub fn new(severity: Severity, advice: impl Into<String>) -> Self {
        Self {
            severity,
            advice: advice.into(),
            disclaimer: DISCLAIMER,
        }
    }

    pub fn disclaimer(&self) -> &str {
        self.disclaimer
    }
}
