//! Form field identifiers, current field values, and single-field updates.
//!
//! Numeric inputs are held as the text the applicant typed. Validation
//! decides whether that text is a usable number; the typed view lives in
//! [`crate::domain::LoanApplication`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies one input on the loan application form.
///
/// Variants are ordered as the fields appear on the form, so collections keyed
/// by `FieldName` iterate top to bottom.
///
/// # Examples
/// ```
/// use loan_form::domain::FieldName;
///
/// let field: FieldName = "repaymentYears".parse().expect("known field");
/// assert_eq!(field, FieldName::RepaymentYears);
/// assert_eq!(field.to_string(), "repaymentYears");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    /// Applicant's full name.
    Name,
    /// Applicant's mobile number.
    Phone,
    /// Applicant's age in years.
    Age,
    /// Whether the applicant is employed.
    Employed,
    /// Monthly salary bucket.
    SalaryRange,
    /// Requested loan amount.
    LoanAmount,
    /// Free-text purpose of the loan.
    LoanPurpose,
    /// Requested repayment period in years.
    RepaymentYears,
    /// Free-text comments.
    Comments,
}

impl FieldName {
    /// Every field in form order.
    pub const ALL: [Self; 9] = [
        Self::Name,
        Self::Phone,
        Self::Age,
        Self::Employed,
        Self::SalaryRange,
        Self::LoanAmount,
        Self::LoanPurpose,
        Self::RepaymentYears,
        Self::Comments,
    ];

    /// Stable identifier used in drafts and by UI shells.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Age => "age",
            Self::Employed => "employed",
            Self::SalaryRange => "salaryRange",
            Self::LoanAmount => "loanAmount",
            Self::LoanPurpose => "loanPurpose",
            Self::RepaymentYears => "repaymentYears",
            Self::Comments => "comments",
        }
    }

    /// Human-readable label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Phone => "Phone number",
            Self::Age => "Age",
            Self::Employed => "Employment",
            Self::SalaryRange => "Monthly salary",
            Self::LoanAmount => "Loan amount",
            Self::LoanPurpose => "Loan purpose",
            Self::RepaymentYears => "Repayment period",
            Self::Comments => "Comments",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {input}")]
pub struct ParseFieldNameError {
    /// The unrecognised input value.
    pub input: String,
}

impl FromStr for FieldName {
    type Err = ParseFieldNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ParseFieldNameError {
                input: s.to_owned(),
            })
    }
}

/// Monthly salary bucket offered by the salary select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalaryRange {
    /// Less than 20 000 kr.
    #[serde(rename = "under-20000")]
    Under20000,
    /// Between 20 000 and 35 000 kr.
    #[serde(rename = "20000-35000")]
    From20000To35000,
    /// Between 35 000 and 50 000 kr.
    #[serde(rename = "35000-50000")]
    From35000To50000,
    /// More than 50 000 kr.
    #[serde(rename = "over-50000")]
    Over50000,
}

impl SalaryRange {
    /// Every bucket, lowest first.
    pub const ALL: [Self; 4] = [
        Self::Under20000,
        Self::From20000To35000,
        Self::From35000To50000,
        Self::Over50000,
    ];

    /// The lowest bucket; selecting it raises the salary advisory.
    pub const LOWEST: Self = Self::Under20000;

    /// Identifier stored in the form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Under20000 => "under-20000",
            Self::From20000To35000 => "20000-35000",
            Self::From35000To50000 => "35000-50000",
            Self::Over50000 => "over-50000",
        }
    }
}

impl fmt::Display for SalaryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown salary bucket.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown salary range: {input}")]
pub struct ParseSalaryRangeError {
    /// The unrecognised input value.
    pub input: String,
}

impl FromStr for SalaryRange {
    type Err = ParseSalaryRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| ParseSalaryRangeError {
                input: s.to_owned(),
            })
    }
}

/// Current contents of every form field.
///
/// The default value is the pristine form: empty strings and an unset
/// employment answer. The serialised shape is the draft payload, so unknown
/// or missing keys are rejected rather than merged.
///
/// # Examples
/// ```
/// use loan_form::domain::{FieldName, FieldUpdate, FormValues};
///
/// let mut values = FormValues::default();
/// assert!(values.is_pristine());
///
/// values.apply(FieldUpdate::Age("42".to_owned()));
/// assert_eq!(values.text(FieldName::Age), Some("42"));
/// assert!(!values.is_pristine());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct FormValues {
    /// Applicant's full name.
    pub name: String,
    /// Applicant's mobile number.
    pub phone: String,
    /// Age as typed.
    pub age: String,
    /// Employment answer; `None` until the applicant answers.
    pub employed: Option<bool>,
    /// Salary bucket identifier; empty when nothing is selected.
    pub salary_range: String,
    /// Loan amount as typed; empty when not given.
    pub loan_amount: String,
    /// Purpose of the loan.
    pub loan_purpose: String,
    /// Repayment period in years as typed; empty when not given.
    pub repayment_years: String,
    /// Free-text comments.
    pub comments: String,
}

impl FormValues {
    /// Borrow the text of a text-backed field.
    ///
    /// Returns `None` for [`FieldName::Employed`], which is not text.
    #[must_use]
    pub fn text(&self, field: FieldName) -> Option<&str> {
        let value = match field {
            FieldName::Name => &self.name,
            FieldName::Phone => &self.phone,
            FieldName::Age => &self.age,
            FieldName::Employed => return None,
            FieldName::SalaryRange => &self.salary_range,
            FieldName::LoanAmount => &self.loan_amount,
            FieldName::LoanPurpose => &self.loan_purpose,
            FieldName::RepaymentYears => &self.repayment_years,
            FieldName::Comments => &self.comments,
        };
        Some(value.as_str())
    }

    /// Replace one field with the value carried by `update`.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(value) => self.name = value,
            FieldUpdate::Phone(value) => self.phone = value,
            FieldUpdate::Age(value) => self.age = value,
            FieldUpdate::Employed(value) => self.employed = value,
            FieldUpdate::SalaryRange(value) => self.salary_range = value,
            FieldUpdate::LoanAmount(value) => self.loan_amount = value,
            FieldUpdate::LoanPurpose(value) => self.loan_purpose = value,
            FieldUpdate::RepaymentYears(value) => self.repayment_years = value,
            FieldUpdate::Comments(value) => self.comments = value,
        }
    }

    /// Whether every field still holds its default.
    #[must_use]
    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }
}

/// A change to exactly one field, as reported by a UI shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// New name text.
    Name(String),
    /// New phone text.
    Phone(String),
    /// New age text.
    Age(String),
    /// New employment answer.
    Employed(Option<bool>),
    /// New salary bucket identifier.
    SalaryRange(String),
    /// New loan amount text.
    LoanAmount(String),
    /// New loan purpose text.
    LoanPurpose(String),
    /// New repayment period text.
    RepaymentYears(String),
    /// New comments text.
    Comments(String),
}

impl FieldUpdate {
    /// Build an update from a field identifier and the raw text a shell
    /// collected.
    ///
    /// Text fields take `raw` verbatim. The employment answer accepts
    /// `yes`/`no`, `true`/`false`, `ja`/`nej`, `y`/`n` or `1`/`0` in any case;
    /// blank input unsets it.
    ///
    /// # Errors
    ///
    /// Returns [`FieldUpdateError::InvalidBoolean`] when the employment answer
    /// is not recognised.
    ///
    /// # Examples
    /// ```
    /// use loan_form::domain::{FieldName, FieldUpdate};
    ///
    /// let update = FieldUpdate::parse(FieldName::Employed, "Ja").expect("valid answer");
    /// assert_eq!(update, FieldUpdate::Employed(Some(true)));
    /// ```
    pub fn parse(field: FieldName, raw: &str) -> Result<Self, FieldUpdateError> {
        let text = raw.to_owned();
        let update = match field {
            FieldName::Name => Self::Name(text),
            FieldName::Phone => Self::Phone(text),
            FieldName::Age => Self::Age(text),
            FieldName::Employed => Self::Employed(parse_answer(raw)?),
            FieldName::SalaryRange => Self::SalaryRange(text),
            FieldName::LoanAmount => Self::LoanAmount(text),
            FieldName::LoanPurpose => Self::LoanPurpose(text),
            FieldName::RepaymentYears => Self::RepaymentYears(text),
            FieldName::Comments => Self::Comments(text),
        };
        Ok(update)
    }

    /// Update that restores `field` to its default.
    #[must_use]
    pub const fn cleared(field: FieldName) -> Self {
        match field {
            FieldName::Name => Self::Name(String::new()),
            FieldName::Phone => Self::Phone(String::new()),
            FieldName::Age => Self::Age(String::new()),
            FieldName::Employed => Self::Employed(None),
            FieldName::SalaryRange => Self::SalaryRange(String::new()),
            FieldName::LoanAmount => Self::LoanAmount(String::new()),
            FieldName::LoanPurpose => Self::LoanPurpose(String::new()),
            FieldName::RepaymentYears => Self::RepaymentYears(String::new()),
            FieldName::Comments => Self::Comments(String::new()),
        }
    }

    /// The field this update targets.
    #[must_use]
    pub const fn field(&self) -> FieldName {
        match self {
            Self::Name(_) => FieldName::Name,
            Self::Phone(_) => FieldName::Phone,
            Self::Age(_) => FieldName::Age,
            Self::Employed(_) => FieldName::Employed,
            Self::SalaryRange(_) => FieldName::SalaryRange,
            Self::LoanAmount(_) => FieldName::LoanAmount,
            Self::LoanPurpose(_) => FieldName::LoanPurpose,
            Self::RepaymentYears(_) => FieldName::RepaymentYears,
            Self::Comments(_) => FieldName::Comments,
        }
    }
}

/// Errors returned by [`FieldUpdate::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldUpdateError {
    /// The employment answer was not a recognised yes/no value.
    #[error("expected yes or no for employment, got {value:?}")]
    InvalidBoolean {
        /// The rejected input.
        value: String,
    },
}

fn parse_answer(raw: &str) -> Result<Option<bool>, FieldUpdateError> {
    match raw.trim().to_lowercase().as_str() {
        "" => Ok(None),
        "yes" | "y" | "true" | "ja" | "1" => Ok(Some(true)),
        "no" | "n" | "false" | "nej" | "0" => Ok(Some(false)),
        _ => Err(FieldUpdateError::InvalidBoolean {
            value: raw.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for field identifiers and updates.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn field_identifiers_round_trip() {
        for field in FieldName::ALL {
            let parsed: FieldName = field.as_str().parse().expect("known identifier");
            assert_eq!(parsed, field);
        }
    }

    #[rstest]
    #[case::unknown("income")]
    #[case::snake_case("salary_range")]
    #[case::capitalised("Name")]
    fn unknown_field_identifiers_are_rejected(#[case] input: &str) {
        let err = input.parse::<FieldName>().expect_err("unknown field");
        assert_eq!(err.input, input);
    }

    #[rstest]
    fn field_order_follows_the_form() {
        let mut shuffled = vec![FieldName::Comments, FieldName::Name, FieldName::Age];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![FieldName::Name, FieldName::Age, FieldName::Comments]
        );
    }

    #[rstest]
    #[case("under-20000", SalaryRange::Under20000)]
    #[case("20000-35000", SalaryRange::From20000To35000)]
    #[case("35000-50000", SalaryRange::From35000To50000)]
    #[case("over-50000", SalaryRange::Over50000)]
    fn salary_ranges_parse_from_identifiers(#[case] input: &str, #[case] expected: SalaryRange) {
        assert_eq!(input.parse::<SalaryRange>(), Ok(expected));
        let json = serde_json::to_string(&expected).expect("serialise");
        assert_eq!(json, format!("\"{input}\""));
    }

    #[rstest]
    fn pristine_values_have_empty_defaults() {
        let values = FormValues::default();
        assert!(values.is_pristine());
        assert_eq!(values.employed, None);
        for field in FieldName::ALL {
            if let Some(text) = values.text(field) {
                assert!(text.is_empty(), "{field} should default to empty");
            }
        }
    }

    #[rstest]
    fn apply_replaces_only_the_target_field() {
        let mut values = FormValues {
            name: "Anna".to_owned(),
            ..FormValues::default()
        };
        values.apply(FieldUpdate::LoanAmount("25000".to_owned()));

        assert_eq!(values.name, "Anna");
        assert_eq!(values.loan_amount, "25000");
    }

    #[rstest]
    #[case("yes", Some(true))]
    #[case(" NEJ ", Some(false))]
    #[case("true", Some(true))]
    #[case("0", Some(false))]
    #[case("", None)]
    fn employment_answers_parse(#[case] raw: &str, #[case] expected: Option<bool>) {
        let update = FieldUpdate::parse(FieldName::Employed, raw).expect("valid answer");
        assert_eq!(update, FieldUpdate::Employed(expected));
    }

    #[rstest]
    fn unrecognised_employment_answers_fail() {
        let err = FieldUpdate::parse(FieldName::Employed, "maybe").expect_err("invalid");
        assert_eq!(
            err,
            FieldUpdateError::InvalidBoolean {
                value: "maybe".to_owned()
            }
        );
    }

    #[rstest]
    fn text_updates_keep_raw_input() {
        let update = FieldUpdate::parse(FieldName::Comments, "  spaced  ").expect("text");
        assert_eq!(update, FieldUpdate::Comments("  spaced  ".to_owned()));
        assert_eq!(update.field(), FieldName::Comments);
    }

    #[rstest]
    fn cleared_updates_restore_defaults() {
        let mut values = FormValues {
            employed: Some(true),
            phone: "0701234567".to_owned(),
            ..FormValues::default()
        };
        values.apply(FieldUpdate::cleared(FieldName::Employed));
        values.apply(FieldUpdate::cleared(FieldName::Phone));
        assert!(values.is_pristine());
    }

    #[rstest]
    fn draft_shape_rejects_unknown_keys() {
        let json = r#"{"name":"","phone":"","age":"","employed":null,"salaryRange":"",
            "loanAmount":"","loanPurpose":"","repaymentYears":"","comments":"","extra":1}"#;
        assert!(serde_json::from_str::<FormValues>(json).is_err());
    }
}
