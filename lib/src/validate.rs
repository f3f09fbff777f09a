//! Parsing and validation of the values typed at the menu prompts.

use std::{env, path::PathBuf, str::FromStr};

use chrono::NaiveDate;

use crate::{error::Validation, types::Interval};

/// Display format of the date prompts.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Splits a comma separated list of tickers, keeping order, case and
/// duplicates. Empty tokens are dropped.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, Validation> {
    let tickers: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|ticker| !ticker.is_empty())
        .map(String::from)
        .collect();
    if tickers.is_empty() {
        return Err(Validation::NoTickers);
    }
    Ok(tickers)
}

/// Parses a `DD-MM-YYYY` pair. The start is not required to precede the end.
pub fn parse_dates(
    start: &str,
    end: &str,
) -> Result<(NaiveDate, NaiveDate), Validation> {
    Ok((parse_date(start)?, parse_date(end)?))
}

fn parse_date(input: &str) -> Result<NaiveDate, Validation> {
    let input = input.trim();
    // chrono tolerates signs and wide years, the prompt format doesn't
    let widths: Vec<usize> = input.split('-').map(str::len).collect();
    let shape_ok = matches!(widths[..], [1 | 2, 1 | 2, 4])
        && input.chars().all(|c| c == '-' || c.is_ascii_digit());
    if !shape_ok {
        return Err(Validation::InvalidDate);
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| Validation::InvalidDate)
}

/// Maps the interval menu choices `a`, `b` and `c`.
pub fn select_interval(choice: &str) -> Result<Interval, Validation> {
    let code = match choice.trim().to_lowercase().as_str() {
        "a" => "1d",
        "b" => "1wk",
        "c" => "1mo",
        _ => return Err(Validation::InvalidChoice),
    };
    Interval::from_str(code).map_err(|_| Validation::InvalidChoice)
}

/// Resolves the save location. Blank input means the current working
/// directory. The directory has to exist already.
pub fn resolve_directory(input: &str) -> Result<PathBuf, Validation> {
    let input = input.trim();
    let path = if input.is_empty() {
        env::current_dir().map_err(|_| Validation::InvalidPath)?
    } else {
        PathBuf::from(input)
    };
    if !path.is_dir() {
        return Err(Validation::InvalidPath);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickers_are_trimmed_and_ordered() {
        let tickers = parse_tickers(" GC=F, ^GSPC,,aapl , AAPL ").unwrap();
        assert_eq!(tickers, vec!["GC=F", "^GSPC", "aapl", "AAPL"]);
    }

    #[test]
    fn only_separators_is_no_tickers() {
        assert_eq!(parse_tickers(" , ,, "), Err(Validation::NoTickers));
        assert_eq!(parse_tickers(""), Err(Validation::NoTickers));
    }

    #[test]
    fn dates_are_normalized() {
        let (start, end) = parse_dates("01-01-2020", "31-12-2020").unwrap();
        assert_eq!(start.to_string(), "2020-01-01");
        assert_eq!(end.to_string(), "2020-12-31");
    }

    #[test]
    fn end_before_start_is_accepted() {
        let (start, end) = parse_dates("31-12-2020", "01-01-2020").unwrap();
        assert!(start > end);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for bad in [
            "2020-01-01",
            "01/01/2020",
            "32-01-2020",
            "29-02-2021",
            "01-01-20",
            "+1-01-2020",
            "aa-01-2020",
            "01-13-2020",
            "",
        ] {
            assert_eq!(
                parse_dates(bad, "01-01-2021"),
                Err(Validation::InvalidDate),
                "{bad}"
            );
            assert_eq!(
                parse_dates("01-01-2021", bad),
                Err(Validation::InvalidDate),
                "{bad}"
            );
        }
        assert!(parse_dates("29-02-2020", "01-03-2020").is_ok());
        assert!(parse_dates("1-3-2020", " 01-04-2020 ").is_ok());
    }

    #[test]
    fn interval_choices() {
        assert_eq!(select_interval("a"), Ok(Interval::Daily));
        assert_eq!(select_interval("B"), Ok(Interval::Weekly));
        assert_eq!(select_interval(" c "), Ok(Interval::Monthly));
        for bad in ["", "d", "1", "ab", "1d"] {
            assert_eq!(select_interval(bad), Err(Validation::InvalidChoice));
        }
    }

    #[test]
    fn blank_directory_is_cwd() {
        assert_eq!(
            resolve_directory("  ").unwrap(),
            env::current_dir().unwrap()
        );
    }

    #[test]
    fn directory_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_directory(dir.path().to_str().unwrap());
        assert_eq!(resolved.unwrap(), dir.path());

        let missing = dir.path().join("missing");
        assert_eq!(
            resolve_directory(missing.to_str().unwrap()),
            Err(Validation::InvalidPath)
        );
        assert!(!missing.exists());

        let file = dir.path().join("file.csv");
        std::fs::write(&file, "").unwrap();
        assert_eq!(
            resolve_directory(file.to_str().unwrap()),
            Err(Validation::InvalidPath)
        );
    }
}
