use glob::Pattern;

/// Selects analyses by their user-typed source label, e.g. `"TCS - SDE"`.
///
/// A whole company is selected with a prefix glob such as `TCS*`; a single
/// posting with its full label.
#[derive(Debug, Clone)]
pub enum LabelPattern {
    Exact(String),
    Glob(Pattern),
}

impl LabelPattern {
    /// Patterns containing `*` or `?` are globs. Both kinds compare against
    /// the label lowercased with whitespace runs collapsed.
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let normalized = normalize_label(pattern);
        if normalized.contains(['*', '?']) {
            let glob_pattern = Pattern::new(&normalized).map_err(|e| {
                crate::Error::InvalidPattern(format!("Invalid label pattern '{}': {}", pattern, e))
            })?;
            Ok(LabelPattern::Glob(glob_pattern))
        } else {
            Ok(LabelPattern::Exact(normalized))
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        let label = normalize_label(label);
        match self {
            LabelPattern::Exact(expected) => label == *expected,
            LabelPattern::Glob(pattern) => pattern.matches(&label),
        }
    }
}

/// Lowercase with whitespace runs collapsed to one space, so `"TCS  -  SDE "`
/// and `"tcs - sde"` name the same posting.
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_label_selects_one_posting() {
        let pattern = LabelPattern::parse("TCS - SDE").unwrap();
        assert!(pattern.matches("tcs - sde"));
        assert!(pattern.matches("  TCS   -  SDE "));
        assert!(!pattern.matches("TCS - Analyst"));
        // A bare company name is not a prefix match
        assert!(!LabelPattern::parse("TCS").unwrap().matches("TCS - SDE"));
    }

    #[test]
    fn test_company_prefix_glob() {
        let pattern = LabelPattern::parse("tcs*").unwrap();
        assert!(pattern.matches("TCS - SDE"));
        assert!(pattern.matches("TCS - Analyst"));
        assert!(!pattern.matches("Infosys - HR"));

        let spaced = LabelPattern::parse("Tata  Consultancy *").unwrap();
        assert!(spaced.matches("tata consultancy - Graduate Trainee"));
    }

    #[test]
    fn test_file_name_glob() {
        let pattern = LabelPattern::parse("drive-?.txt").unwrap();
        assert!(pattern.matches("drive-1.txt"));
        assert!(!pattern.matches("drive-12.txt"));
    }

    #[test]
    fn test_invalid_glob() {
        assert!(LabelPattern::parse("[abc*").is_err());
    }
}
