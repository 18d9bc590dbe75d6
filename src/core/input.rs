use super::engine::validate;
use super::error::{InputField, InvalidInputError};
use super::types::{RawInputs, ScheduleInputs};

/// Parses free-form form text into validated calculator inputs.
///
/// Text is trimmed and must parse as a whole number literal; trailing
/// garbage such as `"12abc"` is rejected instead of being read as `12`.
pub fn parse_inputs(raw: &RawInputs) -> Result<ScheduleInputs, InvalidInputError> {
    let principal = parse_number(InputField::Principal, &raw.principal)?;
    let annual_rate_percent = parse_number(InputField::AnnualRate, &raw.annual_rate_percent)?;
    let years = parse_number(InputField::Years, &raw.years)?;
    let reinvest_percent = parse_number(InputField::ReinvestPercent, &raw.reinvest_percent)?;

    validate(principal, annual_rate_percent, years, reinvest_percent)
}

pub fn parse_number(field: InputField, text: &str) -> Result<f64, InvalidInputError> {
    let trimmed = text.trim();
    trimmed
        .parse::<f64>()
        .map_err(|_| InvalidInputError::NotANumber {
            field,
            raw: text.to_string(),
        })
}
