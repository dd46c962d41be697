//! Extraction of severity and advice from a free-form model reply.
//!
//! Replies that follow the requested `Severity:` / `Advice:` layout are split
//! on those markers. Anything else is kept whole as advice and the severity is
//! guessed from keywords.

use crate::models::Severity;

const SEVERITY_MARKER: &str = "Severity:";
const ADVICE_MARKER: &str = "Advice:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub severity: Severity,
    pub advice: String,
}

pub fn classify(raw_text: &str) -> Classification {
    if raw_text.contains(SEVERITY_MARKER) && raw_text.contains(ADVICE_MARKER) {
        return match extract_structured(raw_text) {
            Some(classification) => classification,
            None => {
                tracing::warn!(
                    reply_len = raw_text.len(),
                    "Could not parse structured reply, returning it verbatim"
                );
                Classification {
                    severity: Severity::Unknown,
                    advice: raw_text.to_string(),
                }
            }
        };
    }

    Classification {
        severity: infer_severity(raw_text),
        advice: raw_text.to_string(),
    }
}

/// Severity runs from the first `Severity:` to the end of its line; with no
/// newline after it, it stops one character short of the end of the text.
/// Advice runs from the first `Advice:` to the end, cut at any later `Severity:`.
fn extract_structured(raw_text: &str) -> Option<Classification> {
    let severity_start = raw_text.find(SEVERITY_MARKER)? + SEVERITY_MARKER.len();
    let severity_line = raw_text.get(severity_start..)?;
    let severity_end = match severity_line.find('\n') {
        Some(newline) => newline,
        None => severity_line
            .char_indices()
            .last()
            .map_or(0, |(last_char, _)| last_char),
    };
    let severity = severity_line.get(..severity_end)?.trim();

    let advice_start = raw_text.find(ADVICE_MARKER)? + ADVICE_MARKER.len();
    let mut advice = raw_text.get(advice_start..)?.trim();
    if let Some(echo) = advice.find(SEVERITY_MARKER) {
        advice = advice.get(..echo)?.trim();
    }

    Some(Classification {
        severity: Severity::from_label(severity),
        advice: advice.to_string(),
    })
}

fn infer_severity(raw_text: &str) -> Severity {
    let lowered = raw_text.to_lowercase();

    if lowered.contains("severe") || lowered.contains("emergency") {
        Severity::Severe
    } else if lowered.contains("doctor") || lowered.contains("medical professional") {
        Severity::Moderate
    } else {
        Severity::Basic
    }
}
