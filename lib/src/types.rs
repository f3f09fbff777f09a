use chrono::NaiveDate;
use derive_builder::Builder;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Sampling granularity of a series, displayed as the provider's code.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
pub enum Interval {
    #[default]
    #[strum(serialize = "1d")]
    Daily,
    #[strum(serialize = "1wk")]
    Weekly,
    #[strum(serialize = "1mo")]
    Monthly,
}

#[derive(Builder)]
#[builder(setter(strip_option))]
pub struct HistoryRequest<'a> {
    pub(crate) ticker: &'a str,
    #[builder(default)]
    pub(crate) interval: Interval,
    /// First day of the range, inclusive.
    pub(crate) start: NaiveDate,
    /// Last day of the range, exclusive.
    pub(crate) end: NaiveDate,
}

impl HistoryRequest<'_> {
    pub fn ticker(&self) -> &str {
        self.ticker
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// One row of a series. Missing cells are written empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Open", serialize_with = "cell")]
    pub open: Option<Decimal>,
    #[serde(rename = "High", serialize_with = "cell")]
    pub high: Option<Decimal>,
    #[serde(rename = "Low", serialize_with = "cell")]
    pub low: Option<Decimal>,
    #[serde(rename = "Close", serialize_with = "cell")]
    pub close: Option<Decimal>,
    #[serde(rename = "Adj Close", serialize_with = "cell")]
    pub adj_close: Option<Decimal>,
    #[serde(rename = "Volume")]
    pub volume: Option<u64>,
}

/// The historical series of one ticker, oldest bar first.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub ticker: String,
    pub bars: Vec<Bar>,
}

fn cell<S: Serializer>(
    value: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serializer.collect_str(value),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn interval_uses_provider_codes() {
        assert_eq!(Interval::Daily.to_string(), "1d");
        assert_eq!(Interval::Weekly.to_string(), "1wk");
        assert_eq!(Interval::Monthly.to_string(), "1mo");
        assert_eq!(Interval::from_str("1wk").unwrap(), Interval::Weekly);
    }

    #[test]
    fn bars_serialize_with_date_first_and_empty_gaps() {
        let bar = Bar {
            date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            open: Some(Decimal::from_str("74.06").unwrap()),
            high: Some(Decimal::from_str("75.15").unwrap()),
            low: None,
            close: Some(Decimal::from_str("75.0875").unwrap()),
            adj_close: Some(Decimal::from_str("72.876").unwrap()),
            volume: Some(135480400),
        };
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&bar).unwrap();
        let written = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            written,
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2020-01-02,74.06,75.15,,75.0875,72.876,135480400\n"
        );
    }
}
