use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate};

/// Dated output filename used when no destination is given.
pub fn default_output_name(date: NaiveDate) -> String {
    format!(
        "Urenstaat-{}-{:02}-Joel-Grimberg.pdf",
        date.year(),
        date.month()
    )
}

/// Output path for "now", relative to the current working directory.
pub fn default_output_path() -> PathBuf {
    PathBuf::from(default_output_name(Local::now().date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(default_output_name(date), "Urenstaat-2024-03-Joel-Grimberg.pdf");
        let date = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        assert_eq!(default_output_name(date), "Urenstaat-2024-11-Joel-Grimberg.pdf");
    }
}
