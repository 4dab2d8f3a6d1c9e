use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single bias pattern reported by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedPattern {
    pub bias_type: BiasType,
    pub severity: Severity,
    #[serde(default)]
    pub evidence_text: String,
    #[serde(default)]
    pub reasoning_text: String,
}

impl DetectedPattern {
    pub fn new(bias_type: impl Into<String>, severity: Severity) -> Self {
        Self {
            bias_type: BiasType::new(bias_type),
            severity,
            evidence_text: String::new(),
            reasoning_text: String::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence_text = evidence.into();
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning_text = reasoning.into();
        self
    }
}

/// Bias type label exactly as emitted by the classifier.
///
/// Equality is exact string equality: `Gender_Bias` and `gender_bias` are
/// different labels. Use [`BiasType::category`] when a coarse grouping is
/// wanted for presentation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiasType(String);

impl BiasType {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Map the raw label onto one of the known bias categories
    pub fn category(&self) -> BiasCategory {
        let lower = self.0.to_lowercase();
        if lower.contains("gender") {
            BiasCategory::Gender
        } else if lower.contains("department") || lower.contains("branch") {
            BiasCategory::Department
        } else if lower.contains("socioeconomic")
            || lower.contains("socio_economic")
            || lower.contains("economic")
        {
            BiasCategory::Socioeconomic
        } else if lower.contains("academic") || lower.contains("college") {
            BiasCategory::Academic
        } else if lower.contains("community") || lower.contains("caste") {
            BiasCategory::Community
        } else {
            BiasCategory::Other
        }
    }

    /// Human readable form, e.g. `academic_elitism` -> `Academic Elitism`
    pub fn display_name(&self) -> String {
        self.0
            .split(['_', '-', ' '])
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for BiasType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BiasType {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BiasCategory {
    Gender,
    Department,
    Socioeconomic,
    Academic,
    Community,
    Other,
}

/// Pattern severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" | "moderate" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(crate::Error::InvalidPattern(format!(
                "Unknown severity: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bias_type_is_case_sensitive() {
        assert_ne!(BiasType::new("Gender_Bias"), BiasType::new("gender_bias"));
        assert_eq!(
            BiasType::new("Gender_Bias").category(),
            BiasType::new("gender_bias").category()
        );
    }

    #[test]
    fn test_bias_type_categories() {
        assert_eq!(BiasType::new("gender_bias").category(), BiasCategory::Gender);
        assert_eq!(
            BiasType::new("academic_elitism").category(),
            BiasCategory::Academic
        );
        assert_eq!(
            BiasType::new("department_exclusion").category(),
            BiasCategory::Department
        );
        assert_eq!(
            BiasType::new("socioeconomic").category(),
            BiasCategory::Socioeconomic
        );
        assert_eq!(
            BiasType::new("community_bias").category(),
            BiasCategory::Community
        );
        assert_eq!(BiasType::new("age_bias").category(), BiasCategory::Other);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            BiasType::new("academic_elitism").display_name(),
            "Academic Elitism"
        );
        assert_eq!(BiasType::new("gender").display_name(), "Gender");
    }

    #[test]
    fn test_severity_ordering_and_parse() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert_eq!("moderate".parse::<Severity>().unwrap(), Severity::Medium);
        assert!("severe".parse::<Severity>().is_err());
    }
}
