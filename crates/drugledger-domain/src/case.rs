//! Case module - one judgment read from the input table

/// Prefix prepended to the case id to build a request's `custom_id`
pub const CUSTOM_ID_PREFIX: &str = "case-";

/// A single court case to be analysed
///
/// Immutable once read from the input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    /// Case number, stringified from the source cell
    pub case_id: String,

    /// Full judgment text; empty when the source cell was null
    pub judgment_text: String,
}

impl CaseRecord {
    /// Create a new case record
    pub fn new(case_id: impl Into<String>, judgment_text: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            judgment_text: judgment_text.into(),
        }
    }

    /// Deterministic request identifier for this case
    ///
    /// # Examples
    ///
    /// ```
    /// use drugledger_domain::CaseRecord;
    ///
    /// let case = CaseRecord::new("1234", "");
    /// assert_eq!(case.custom_id(), "case-1234");
    /// ```
    pub fn custom_id(&self) -> String {
        format!("{}{}", CUSTOM_ID_PREFIX, self.case_id)
    }

    /// User-turn message content: `case_id=<id>` then the judgment on the next line
    pub fn user_message(&self) -> String {
        format!("case_id={}\n{}", self.case_id, self.judgment_text)
    }
}

/// Recover the case id from a request `custom_id`
///
/// Returns `None` if the id does not carry the `case-` prefix.
pub fn case_id_from_custom_id(custom_id: &str) -> Option<&str> {
    custom_id.strip_prefix(CUSTOM_ID_PREFIX)
}
