//! CSV writer for respondent and sleep record tables.
//!
//! Cells are literal text. A cell is quoted when it contains a delimiter,
//! quote or line break; embedded quotes are doubled. Rows end with `\r\n`.

use crate::model::respondent::Respondent;
use crate::model::sleep_record::SleepRecord;
use log::info;
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column headers for sleep record exports.
pub const SLEEP_RECORD_HEADERS: [&str; 14] = [
    "ID",
    "Date",
    "RespId",
    "SleepStartTime",
    "SleepEndTime",
    "TotalSleepHours",
    "SleepQuality",
    "ExerciseMinutes",
    "CaffeineIntakeMg",
    "ScreenTime",
    "WorkHours",
    "ProductivityScore",
    "MoodScore",
    "StressLevel",
];

/// Column headers for respondent exports.
pub const RESPONDENT_HEADERS: [&str; 7] = [
    "ID",
    "First Name",
    "Last Name",
    "Email",
    "Gender",
    "Country",
    "Age",
];

const DELIMITER: char = ',';
const ROW_TERMINATOR: &str = "\r\n";

/// Writes `records` as CSV to `writer`.
pub fn write_sleep_records<W: Write>(mut writer: W, records: &[SleepRecord]) -> io::Result<()> {
    write_row(&mut writer, SLEEP_RECORD_HEADERS.iter().copied())?;
    for record in records {
        let values = &record.measurements;
        let cells = [
            record.id.to_string(),
            record.date.format("%Y-%m-%d").to_string(),
            record.person_id.to_string(),
            values.sleep_start_time.to_string(),
            values.sleep_end_time.to_string(),
            values.total_sleep_hours.to_string(),
            values.sleep_quality.to_string(),
            values.exercise_minutes.to_string(),
            values.caffeine_intake_mg.to_string(),
            values.screen_time.to_string(),
            values.work_hours.to_string(),
            values.productivity_score.to_string(),
            values.mood_score.to_string(),
            values.stress_level.to_string(),
        ];
        write_row(&mut writer, cells.iter().map(String::as_str))?;
    }
    writer.flush()
}

/// Writes `respondents` as CSV to `writer`.
pub fn write_respondents<W: Write>(mut writer: W, respondents: &[Respondent]) -> io::Result<()> {
    write_row(&mut writer, RESPONDENT_HEADERS.iter().copied())?;
    for respondent in respondents {
        let id = respondent.id.to_string();
        let age = respondent.age.to_string();
        write_row(
            &mut writer,
            [
                id.as_str(),
                respondent.first_name.as_str(),
                respondent.last_name.as_str(),
                respondent.email.as_str(),
                respondent.gender.as_str(),
                respondent.country.as_str(),
                age.as_str(),
            ],
        )?;
    }
    writer.flush()
}

/// Creates (or truncates) `path` and writes sleep records to it.
///
/// Returns the number of data rows written.
pub fn export_sleep_records(path: impl AsRef<Path>, records: &[SleepRecord]) -> io::Result<usize> {
    let path = path.as_ref();
    write_sleep_records(BufWriter::new(File::create(path)?), records)?;
    info!(
        "event=export module=export status=ok table=sleep_data rows={}",
        records.len()
    );
    Ok(records.len())
}

/// Creates (or truncates) `path` and writes respondents to it.
///
/// Returns the number of data rows written.
pub fn export_respondents(
    path: impl AsRef<Path>,
    respondents: &[Respondent],
) -> io::Result<usize> {
    let path = path.as_ref();
    write_respondents(BufWriter::new(File::create(path)?), respondents)?;
    info!(
        "event=export module=export status=ok table=respondents rows={}",
        respondents.len()
    );
    Ok(respondents.len())
}

fn write_row<'a, W: Write>(
    writer: &mut W,
    cells: impl IntoIterator<Item = &'a str>,
) -> io::Result<()> {
    for (index, cell) in cells.into_iter().enumerate() {
        if index > 0 {
            write!(writer, "{DELIMITER}")?;
        }
        writer.write_all(escape_cell(cell).as_bytes())?;
    }
    writer.write_all(ROW_TERMINATOR.as_bytes())
}

fn escape_cell(value: &str) -> Cow<'_, str> {
    let needs_quotes = value.contains([DELIMITER, '"', '\n', '\r']);
    if !needs_quotes {
        return Cow::Borrowed(value);
    }
    Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
}

#[cfg(test)]
mod tests {
    use super::{escape_cell, write_row};

    #[test]
    fn plain_cells_are_written_verbatim() {
        assert_eq!(escape_cell("Smith"), "Smith");
        assert_eq!(escape_cell("7.5"), "7.5");
    }

    #[test]
    fn cells_with_delimiters_or_quotes_are_quoted() {
        assert_eq!(escape_cell("Smith, Jr."), "\"Smith, Jr.\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn rows_are_comma_separated_and_crlf_terminated() {
        let mut out = Vec::new();
        write_row(&mut out, ["a", "b,c", ""]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,\"b,c\",\r\n");
    }
}
