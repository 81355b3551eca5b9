//! Declarative field validation.
//!
//! Every field owns an ordered list of [`Rule`]s in [`RULES`]. A single
//! evaluator walks the table and reports the first failing rule per field.
//! Blank input is treated as absent: only [`Rule::Required`] rejects it.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::{FieldName, FormValues, SalaryRange};

/// Youngest age at which an applicant may apply.
pub const MINIMUM_AGE: i64 = 18;

/// Longest repayment period offered, in years.
pub const MAXIMUM_REPAYMENT_YEARS: i64 = 30;

/// A single check applied to one field's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The field must contain non-whitespace text.
    Required,
    /// The trimmed text must be a Swedish mobile number.
    PhoneNumber,
    /// The trimmed text must be a whole number.
    Integer,
    /// The number must be greater than zero.
    Positive,
    /// The number must be at least the given bound.
    Min(i64),
    /// The number must be at most the given bound.
    Max(i64),
    /// The number must fit the integer width the application stores it in.
    FitsIn(NumberWidth),
    /// The text must name one of the salary buckets.
    SalaryBucket,
}

/// Unsigned integer widths used by [`LoanApplication`](super::LoanApplication).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberWidth {
    /// Fits a `u32`.
    U32,
    /// Fits a `u64`.
    U64,
}

impl NumberWidth {
    fn holds(self, number: i128) -> bool {
        match self {
            Self::U32 => u32::try_from(number).is_ok(),
            Self::U64 => u64::try_from(number).is_ok(),
        }
    }
}

/// Validation table: each field with its rules in evaluation order.
///
/// Fields absent from the table are unrestricted.
pub const RULES: &[(FieldName, &[Rule])] = &[
    (FieldName::Name, &[Rule::Required]),
    (FieldName::Phone, &[Rule::Required, Rule::PhoneNumber]),
    (
        FieldName::Age,
        &[
            Rule::Required,
            Rule::Integer,
            Rule::Positive,
            Rule::Min(MINIMUM_AGE),
            Rule::FitsIn(NumberWidth::U32),
        ],
    ),
    (FieldName::SalaryRange, &[Rule::SalaryBucket]),
    (
        FieldName::LoanAmount,
        &[
            Rule::Integer,
            Rule::Positive,
            Rule::FitsIn(NumberWidth::U64),
        ],
    ),
    (
        FieldName::RepaymentYears,
        &[
            Rule::Integer,
            Rule::Positive,
            Rule::Max(MAXIMUM_REPAYMENT_YEARS),
            Rule::FitsIn(NumberWidth::U32),
        ],
    ),
];

static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        // Domestic `07xxxxxxxx` or international `+467xxxxxxxx`.
        let pattern = r"^(?:07|\+467)\d{8}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("phone number regex failed to compile: {error}"))
    })
}

/// Parse trimmed text as a whole number, accepting an optional sign.
///
/// Digit strings too long for `i128` saturate, so they stay whole numbers
/// and fail the width rules instead.
pub(crate) fn parse_integer(text: &str) -> Option<i128> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let saturated = if trimmed.starts_with('-') {
        i128::MIN
    } else {
        i128::MAX
    };
    Some(trimmed.parse().unwrap_or(saturated))
}

impl Rule {
    /// Check `value` against this rule, returning the failure message.
    ///
    /// Every rule except [`Rule::Required`] passes on blank input, and the
    /// numeric bounds pass on non-numeric input so that [`Rule::Integer`]
    /// reports it instead.
    #[must_use]
    pub fn check(self, field: FieldName, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return matches!(self, Self::Required)
                .then(|| format!("{} must not be empty.", field.label()));
        }
        let label = field.label();
        match self {
            Self::Required => None,
            Self::PhoneNumber => (!phone_regex().is_match(trimmed)).then(|| {
                format!("{label} must be a Swedish mobile number such as 0701234567.")
            }),
            Self::Integer => parse_integer(trimmed)
                .is_none()
                .then(|| format!("{label} must be a whole number.")),
            Self::Positive => parse_integer(trimmed)
                .filter(|number| *number <= 0)
                .map(|_| format!("{label} must be greater than zero.")),
            Self::Min(bound) => parse_integer(trimmed)
                .filter(|number| *number < i128::from(bound))
                .map(|_| format!("{label} must be at least {bound}.")),
            Self::Max(bound) => parse_integer(trimmed)
                .filter(|number| *number > i128::from(bound))
                .map(|_| format!("{label} must be at most {bound}.")),
            Self::FitsIn(width) => parse_integer(trimmed)
                .filter(|number| !width.holds(*number))
                .map(|_| format!("{label} is out of range.")),
            Self::SalaryBucket => trimmed
                .parse::<SalaryRange>()
                .is_err()
                .then(|| format!("{label} must be one of the offered ranges.")),
        }
    }
}

/// Per-field error messages produced by [`validate`].
///
/// A field without an entry is valid. Entries iterate in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FieldName, String>);

impl ValidationErrors {
    /// Errors containing exactly one message.
    #[must_use]
    pub fn single(field: FieldName, message: impl Into<String>) -> Self {
        Self(BTreeMap::from([(field, message.into())]))
    }

    /// Message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether `field` failed validation.
    #[must_use]
    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate failing fields and their messages in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl IntoIterator for ValidationErrors {
    type Item = (FieldName, String);
    type IntoIter = btree_map::IntoIter<FieldName, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Validate every field against [`RULES`].
///
/// Pure and deterministic: the result depends only on `values`, and each
/// failing field carries the message of its first failing rule.
///
/// # Examples
/// ```
/// use loan_form::domain::{FieldName, FormValues, validate};
///
/// let values = FormValues {
///     name: "Anna".to_owned(),
///     phone: "0701234567".to_owned(),
///     age: "17".to_owned(),
///     ..FormValues::default()
/// };
/// let errors = validate(&values);
/// assert_eq!(errors.get(FieldName::Age), Some("Age must be at least 18."));
/// assert!(!errors.contains(FieldName::Name));
/// ```
#[must_use]
pub fn validate(values: &FormValues) -> ValidationErrors {
    let failures = RULES.iter().filter_map(|(field, rules)| {
        let text = values.text(*field).unwrap_or_default();
        rules
            .iter()
            .find_map(|rule| rule.check(*field, text))
            .map(|message| (*field, message))
    });
    ValidationErrors(failures.collect())
}
