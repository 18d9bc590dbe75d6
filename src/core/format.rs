use super::types::Schedule;

/// 2^53: past this, a cent count no longer fits exactly in an `f64`.
const EXACT_CENTS_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Rounds to cents, half away from zero, and renders exactly two decimals.
///
/// Negative zero is normalised so that `-0.001` prints as `0.00`. Magnitudes
/// whose cent count exceeds 2^53 have no fractional cents to round, so they
/// are printed from their exact decimal expansion instead.
pub fn fixed2(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let cents = (value * 100.0).round();
    if cents.abs() >= EXACT_CENTS_LIMIT {
        return format!("{value:.2}");
    }
    let rounded = if cents == 0.0 { 0.0 } else { cents / 100.0 };
    format!("{rounded:.2}")
}

/// `$1,234.50` style rendering for tables and summaries.
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = fixed2(value);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, cents) = digits.split_once('.').unwrap_or((digits, "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

fn group_thousands(whole: &str) -> String {
    let mut out = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

const TABLE_HEADERS: [&str; 5] = [
    "Year",
    "Opening Balance",
    "Interest Earned",
    "Reinvested",
    "Closing Balance",
];

/// Plain-text table followed by the summary block.
pub fn render_table(schedule: &Schedule) -> String {
    let rows: Vec<[String; 5]> = schedule
        .years
        .iter()
        .map(|record| {
            [
                record.year.to_string(),
                format_money(record.opening_balance),
                format_money(record.interest_earned),
                format_money(record.reinvested_amount),
                format_money(record.closing_balance),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &TABLE_HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    let summary = &schedule.summary;
    out.push('\n');
    out.push_str("Summary\n");
    out.push_str(&format!(
        "  Final balance:         {}\n",
        format_money(summary.final_balance)
    ));
    out.push_str(&format!(
        "  Total interest earned: {}\n",
        format_money(summary.total_interest_earned)
    ));
    out.push_str(&format!(
        "  Total reinvested:      {}\n",
        format_money(summary.total_reinvested)
    ));
    out.push_str(&format!(
        "  Total withdrawn:       {}\n",
        format_money(summary.total_withdrawn())
    ));
    out
}

fn push_row(out: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (cell, &width))| {
            if idx == 0 {
                format!("{cell:<width$}")
            } else {
                format!("{cell:>width$}")
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
