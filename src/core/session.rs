use super::engine::run_schedule;
use super::error::{ExportError, InvalidInputError};
use super::export::build_csv;
use super::input::parse_inputs;
use super::types::{RawInputs, Schedule};

/// Holds the most recent successful schedule so it can be exported later.
///
/// A failed calculation clears the held schedule; exporting never sees data
/// from an earlier, different set of inputs.
#[derive(Debug, Default)]
pub struct ScheduleSession {
    latest: Option<Schedule>,
}

impl ScheduleSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calculate(&mut self, raw: &RawInputs) -> Result<&Schedule, InvalidInputError> {
        self.latest = None;
        let inputs = parse_inputs(raw)?;
        Ok(&*self.latest.insert(run_schedule(&inputs)))
    }

    pub fn latest(&self) -> Option<&Schedule> {
        self.latest.as_ref()
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        let schedule = self.latest.as_ref().ok_or(ExportError::NothingToExport)?;
        build_csv(&schedule.years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(principal: &str, rate: &str, years: &str, reinvest: &str) -> RawInputs {
        RawInputs {
            principal: principal.to_string(),
            annual_rate_percent: rate.to_string(),
            years: years.to_string(),
            reinvest_percent: reinvest.to_string(),
        }
    }

    #[test]
    fn export_before_calculation_is_refused() {
        let session = ScheduleSession::new();
        assert!(session.latest().is_none());
        assert!(matches!(
            session.export_csv(),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn successful_calculation_is_exportable() {
        let mut session = ScheduleSession::new();
        let schedule = session
            .calculate(&raw("3000", "5", "3", "100"))
            .expect("valid inputs");
        assert_eq!(schedule.years.len(), 3);

        let csv = session.export_csv().expect("schedule is held");
        assert!(csv.ends_with("3,3307.50,165.38,165.38,3472.88"));
    }

    #[test]
    fn later_calculation_overwrites_held_schedule() {
        let mut session = ScheduleSession::new();
        session
            .calculate(&raw("3000", "5", "3", "100"))
            .expect("valid inputs");
        session
            .calculate(&raw("100", "10", "1", "100"))
            .expect("valid inputs");

        let csv = session.export_csv().expect("schedule is held");
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.ends_with("1,100.00,10.00,10.00,110.00"));
    }

    #[test]
    fn invalid_calculation_clears_stale_export() {
        let mut session = ScheduleSession::new();
        session
            .calculate(&raw("3000", "5", "3", "100"))
            .expect("valid inputs");

        let err = session
            .calculate(&raw("3000", "5", "0", "100"))
            .expect_err("zero years must fail");
        assert_eq!(err, InvalidInputError::NonPositiveYears { value: 0.0 });
        assert!(session.latest().is_none());
        assert!(matches!(
            session.export_csv(),
            Err(ExportError::NothingToExport)
        ));
    }
}
