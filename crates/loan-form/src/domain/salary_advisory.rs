//! Advisory shown next to the salary field.

use super::SalaryRange;

/// Advisory text raised when the lowest salary bucket is selected.
pub const LOW_SALARY_WARNING: &str = "Note that a low salary may affect your loan application.";

/// Advisory for the given salary field text.
///
/// Only the lowest bucket raises the advisory; any other value, including
/// empty or unknown text, clears it. The advisory never blocks submission.
///
/// # Examples
/// ```
/// use loan_form::domain::{LOW_SALARY_WARNING, salary_warning};
///
/// assert_eq!(salary_warning("under-20000"), Some(LOW_SALARY_WARNING));
/// assert_eq!(salary_warning("over-50000"), None);
/// ```
#[must_use]
pub fn salary_warning(salary_range: &str) -> Option<&'static str> {
    (salary_range.trim().parse::<SalaryRange>().ok() == Some(SalaryRange::LOWEST))
        .then_some(LOW_SALARY_WARNING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lowest("under-20000", true)]
    #[case::middle("20000-35000", false)]
    #[case::upper("35000-50000", false)]
    #[case::highest("over-50000", false)]
    #[case::empty("", false)]
    #[case::unknown("under-10000", false)]
    fn warns_only_for_the_lowest_bucket(#[case] value: &str, #[case] warns: bool) {
        assert_eq!(salary_warning(value).is_some(), warns);
    }
}
