mod engine;
mod error;
mod export;
mod format;
mod input;
mod session;
mod types;

pub use engine::{MAX_REINVEST_PERCENT, MAX_YEARS, compute, run_schedule, validate};
pub use error::{ExportError, InputField, InvalidInputError};
pub use export::{CSV_FILE_NAME, CSV_HEADERS, CsvRow, build_csv, parse_csv};
pub use format::{fixed2, format_money, render_table};
pub use input::{parse_inputs, parse_number};
pub use session::ScheduleSession;
pub use types::{RawInputs, Schedule, ScheduleInputs, ScheduleSummary, YearRecord};
