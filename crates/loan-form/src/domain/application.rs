//! Typed loan application built from validated form values.

use serde::Serialize;

use super::validation::parse_integer;
use super::{FieldName, FormValues, SalaryRange, ValidationErrors, validate};

/// A loan application that has passed validation.
///
/// Only this type reaches the
/// [`LoanApplicationGateway`](crate::domain::ports::LoanApplicationGateway).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    /// Applicant's full name, trimmed.
    pub name: String,
    /// Applicant's mobile number, trimmed.
    pub phone: String,
    /// Applicant's age in years.
    pub age: u32,
    /// Employment answer, if given.
    pub employed: Option<bool>,
    /// Selected salary bucket, if any.
    pub salary_range: Option<SalaryRange>,
    /// Requested loan amount, if given.
    pub loan_amount: Option<u64>,
    /// Purpose of the loan.
    pub loan_purpose: String,
    /// Requested repayment period in years, if given.
    pub repayment_years: Option<u32>,
    /// Free-text comments.
    pub comments: String,
}

impl LoanApplication {
    /// Validate `values` and convert them into a typed application.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationErrors`] from [`validate`] when any field
    /// fails. The width rules guarantee that every number passing
    /// [`validate`] converts.
    ///
    /// # Examples
    /// ```
    /// use loan_form::domain::{FormValues, LoanApplication};
    ///
    /// let values = FormValues {
    ///     name: " Anna ".to_owned(),
    ///     phone: "0701234567".to_owned(),
    ///     age: "34".to_owned(),
    ///     loan_amount: "25000".to_owned(),
    ///     ..FormValues::default()
    /// };
    /// let application = LoanApplication::try_from_values(&values).expect("valid");
    /// assert_eq!(application.name, "Anna");
    /// assert_eq!(application.loan_amount, Some(25_000));
    /// assert_eq!(application.repayment_years, None);
    /// ```
    pub fn try_from_values(values: &FormValues) -> Result<Self, ValidationErrors> {
        let errors = validate(values);
        if !errors.is_empty() {
            return Err(errors);
        }

        let age = required_number(FieldName::Age, &values.age)?;
        let loan_amount = optional_number(FieldName::LoanAmount, &values.loan_amount)?;
        let repayment_years = optional_number(FieldName::RepaymentYears, &values.repayment_years)?;
        let salary_range = values.salary_range.trim().parse::<SalaryRange>().ok();

        Ok(Self {
            name: values.name.trim().to_owned(),
            phone: values.phone.trim().to_owned(),
            age,
            employed: values.employed,
            salary_range,
            loan_amount,
            loan_purpose: values.loan_purpose.trim().to_owned(),
            repayment_years,
            comments: values.comments.clone(),
        })
    }
}

fn optional_number<T>(field: FieldName, text: &str) -> Result<Option<T>, ValidationErrors>
where
    T: TryFrom<i128>,
{
    if text.trim().is_empty() {
        return Ok(None);
    }
    required_number(field, text).map(Some)
}

fn required_number<T>(field: FieldName, text: &str) -> Result<T, ValidationErrors>
where
    T: TryFrom<i128>,
{
    parse_integer(text)
        .and_then(|number| T::try_from(number).ok())
        .ok_or_else(|| {
            ValidationErrors::single(field, format!("{} is out of range.", field.label()))
        })
}
