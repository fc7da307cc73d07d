//! Drug module - substance facts extracted from a judgment

use rust_decimal::Decimal;

/// Label used for entries whose standardised name is blank
pub const UNSPECIFIED_DRUG: &str = "未指明";

/// Model's confidence in an extracted entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Certainty {
    /// Amount and substance stated explicitly
    High,

    /// Inferred from surrounding context
    Medium,

    /// Weak or ambiguous evidence
    Low,
}

impl Certainty {
    /// All levels, in the order the output schema lists them
    pub const ALL: [Certainty; 3] = [Certainty::High, Certainty::Medium, Certainty::Low];

    /// Get the certainty name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Certainty::High => "high",
            Certainty::Medium => "medium",
            Certainty::Low => "low",
        }
    }

    /// Parse a certainty level (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Certainty::High),
            "medium" => Some(Certainty::Medium),
            "low" => Some(Certainty::Low),
            _ => None,
        }
    }
}

impl std::str::FromStr for Certainty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid certainty: {}", s))
    }
}

/// One substance/amount fact reported by the model for a case
///
/// Text fields are kept verbatim from the model output; only `amount_grams`
/// is converted, into an exact decimal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DrugEntry {
    /// Standardised substance name (may be blank)
    pub name_std: String,

    /// Name as written in the judgment
    pub name_raw: String,

    /// Net weight in grams; zero when the model gave none
    pub amount_grams: Decimal,

    /// Unit as written in the judgment
    pub unit_raw: String,

    /// Amount text as written in the judgment
    pub amount_raw_text: String,

    /// Quoted sentence supporting the entry
    pub evidence_span: String,

    /// Certainty tag as emitted by the model
    pub certainty: String,
}

impl DrugEntry {
    /// Standardised name, trimmed, or `unspecified` when blank
    ///
    /// # Examples
    ///
    /// ```
    /// use drugledger_domain::DrugEntry;
    ///
    /// let entry = DrugEntry { name_std: "  ".to_string(), ..Default::default() };
    /// assert_eq!(entry.normalized_name("未指明"), "未指明");
    /// ```
    pub fn normalized_name(&self, unspecified: &str) -> String {
        let trimmed = self.name_std.trim();
        if trimmed.is_empty() {
            unspecified.to_string()
        } else {
            trimmed.to_string()
        }
    }

    /// Certainty as a typed level, if it is one of the schema values
    pub fn certainty_level(&self) -> Option<Certainty> {
        Certainty::parse(&self.certainty)
    }
}

/// Structured extraction result for a single case
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaseExtraction {
    /// Case id echoed by the model
    pub case_id: String,

    /// Entries in the order the model listed them
    pub drugs: Vec<DrugEntry>,

    /// Model's own `totals.amount_grams_sum`, if present
    pub reported_total_grams: Option<Decimal>,

    /// Free-form notes (e.g. gross-weight-only remarks)
    pub notes: String,
}

impl CaseExtraction {
    /// Exact sum of the entry amounts
    pub fn entry_total(&self) -> Decimal {
        self.drugs.iter().map(|d| d.amount_grams).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_certainty_parsing() {
        assert_eq!(Certainty::parse("high"), Some(Certainty::High));
        assert_eq!(Certainty::parse("Medium"), Some(Certainty::Medium));
        assert_eq!(Certainty::parse(" LOW "), Some(Certainty::Low));
        assert_eq!(Certainty::parse("certain"), None);
        assert!(Certainty::from_str("unknown").is_err());
    }

    #[test]
    fn test_normalized_name() {
        let mut entry = DrugEntry {
            name_std: " 甲基苯丙胺 ".to_string(),
            ..Default::default()
        };
        assert_eq!(entry.normalized_name(UNSPECIFIED_DRUG), "甲基苯丙胺");

        entry.name_std = String::new();
        assert_eq!(entry.normalized_name(UNSPECIFIED_DRUG), UNSPECIFIED_DRUG);
    }

    #[test]
    fn test_entry_total_is_exact() {
        let extraction = CaseExtraction {
            drugs: vec![
                DrugEntry {
                    amount_grams: Decimal::from_str("0.1").unwrap(),
                    ..Default::default()
                },
                DrugEntry {
                    amount_grams: Decimal::from_str("0.2").unwrap(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(extraction.entry_total(), Decimal::from_str("0.3").unwrap());
    }
}
