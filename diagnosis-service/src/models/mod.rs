pub mod diagnosis;

pub use diagnosis::{DiagnosisRequest, DiagnosisResult, Severity, DISCLAIMER};
