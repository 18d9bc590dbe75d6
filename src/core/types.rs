use serde::Serialize;

/// Inputs to the schedule calculator, already parsed and validated.
///
/// Rates are kept in percent, the way they are entered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInputs {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
    pub reinvest_percent: f64,
}

impl Default for ScheduleInputs {
    fn default() -> Self {
        Self {
            principal: 3_000.0,
            annual_rate_percent: 5.0,
            years: 10,
            reinvest_percent: 100.0,
        }
    }
}

/// Unparsed form values, one string per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub principal: String,
    pub annual_rate_percent: String,
    pub years: String,
    pub reinvest_percent: String,
}

impl From<ScheduleInputs> for RawInputs {
    fn from(value: ScheduleInputs) -> Self {
        Self {
            principal: value.principal.to_string(),
            annual_rate_percent: value.annual_rate_percent.to_string(),
            years: value.years.to_string(),
            reinvest_percent: value.reinvest_percent.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year: u32,
    pub opening_balance: f64,
    pub interest_earned: f64,
    pub reinvested_amount: f64,
    pub closing_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub final_balance: f64,
    pub total_interest_earned: f64,
    pub total_reinvested: f64,
}

impl ScheduleSummary {
    /// Interest earned but not added back to the balance.
    pub fn total_withdrawn(&self) -> f64 {
        self.total_interest_earned - self.total_reinvested
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub inputs: ScheduleInputs,
    pub years: Vec<YearRecord>,
    pub summary: ScheduleSummary,
}
