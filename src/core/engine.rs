use super::error::{InputField, InvalidInputError};
use super::types::{Schedule, ScheduleInputs, ScheduleSummary, YearRecord};

/// Upper bound on the simulated horizon. Guards against runaway iteration
/// when the calculator runs without a form enforcing sane limits.
pub const MAX_YEARS: u32 = 1_000;

pub const MAX_REINVEST_PERCENT: f64 = 10_000.0;

/// Validates the raw numeric inputs and runs the schedule.
///
/// `years` is taken as `f64` so that negative, fractional and non-finite
/// counts are rejected here rather than truncated by a cast at the call site.
pub fn compute(
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
    reinvest_percent: f64,
) -> Result<Schedule, InvalidInputError> {
    let inputs = validate(principal, annual_rate_percent, years, reinvest_percent)?;
    Ok(run_schedule(&inputs))
}

pub fn validate(
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
    reinvest_percent: f64,
) -> Result<ScheduleInputs, InvalidInputError> {
    let principal = require_finite(InputField::Principal, principal)?;
    if principal < 0.0 {
        return Err(InvalidInputError::OutOfRange {
            field: InputField::Principal,
            value: principal,
            expected: "must be >= 0",
        });
    }

    let annual_rate_percent = require_finite(InputField::AnnualRate, annual_rate_percent)?;

    let years = validate_years(years)?;

    let reinvest_percent = require_finite(InputField::ReinvestPercent, reinvest_percent)?;
    if !(0.0..=MAX_REINVEST_PERCENT).contains(&reinvest_percent) {
        return Err(InvalidInputError::OutOfRange {
            field: InputField::ReinvestPercent,
            value: reinvest_percent,
            expected: "must be between 0 and 10000",
        });
    }

    Ok(ScheduleInputs {
        principal,
        annual_rate_percent,
        years,
        reinvest_percent,
    })
}

fn require_finite(field: InputField, value: f64) -> Result<f64, InvalidInputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InvalidInputError::NotFinite { field })
    }
}

fn validate_years(years: f64) -> Result<u32, InvalidInputError> {
    let years = require_finite(InputField::Years, years)?;
    if years.fract() != 0.0 {
        return Err(InvalidInputError::NotAWholeNumber {
            field: InputField::Years,
            value: years,
        });
    }
    if years < 1.0 {
        return Err(InvalidInputError::NonPositiveYears { value: years });
    }
    if years > f64::from(MAX_YEARS) {
        return Err(InvalidInputError::OutOfRange {
            field: InputField::Years,
            value: years,
            expected: "must be <= 1000",
        });
    }
    Ok(years as u32)
}

/// Runs the reinvestment recurrence for already validated inputs.
///
/// No rounding is applied between years; each closing balance is carried
/// forward bit for bit as the next opening balance.
pub fn run_schedule(inputs: &ScheduleInputs) -> Schedule {
    let rate = inputs.annual_rate_percent / 100.0;
    let reinvest_fraction = inputs.reinvest_percent / 100.0;

    let mut balance = inputs.principal;
    let mut total_interest_earned = 0.0;
    let mut total_reinvested = 0.0;
    let mut years = Vec::with_capacity(inputs.years as usize);

    for year in 1..=inputs.years {
        let interest_earned = balance * rate;
        let reinvested_amount = interest_earned * reinvest_fraction;
        let closing_balance = balance + reinvested_amount;

        years.push(YearRecord {
            year,
            opening_balance: balance,
            interest_earned,
            reinvested_amount,
            closing_balance,
        });

        total_interest_earned += interest_earned;
        total_reinvested += reinvested_amount;
        balance = closing_balance;
    }

    Schedule {
        inputs: *inputs,
        years,
        summary: ScheduleSummary {
            final_balance: balance,
            total_interest_earned,
            total_reinvested,
        },
    }
}
