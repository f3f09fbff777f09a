use std::path::PathBuf;

use chrono::NaiveDate;

use crate::{
    error::Validation,
    types::Interval,
    validate::{parse_dates, parse_tickers, resolve_directory, select_interval},
};

const BASE_URL: &str = "https://query2.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Where and as whom the provider is queried.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// What the user has configured so far. Setters only touch their fields
/// when the input validates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DownloadConfig {
    /// Tickers to download, in the order they were typed.
    pub tickers: Vec<String>,
    /// The first day to pull data from
    pub start: Option<NaiveDate>,
    /// The day to pull data up to, exclusive
    pub end: Option<NaiveDate>,
    /// The sampling granularity of the series.
    pub interval: Option<Interval>,
    /// The folder to save the results in.
    pub save_dir: Option<PathBuf>,
}

/// A complete configuration, handed to the download loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    pub tickers: Vec<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: Interval,
    pub save_dir: PathBuf,
}

impl DownloadConfig {
    pub fn set_tickers(&mut self, input: &str) -> Result<(), Validation> {
        self.tickers = parse_tickers(input)?;
        Ok(())
    }

    pub fn set_dates(
        &mut self,
        start: &str,
        end: &str,
    ) -> Result<(), Validation> {
        let (start, end) = parse_dates(start, end)?;
        self.start = Some(start);
        self.end = Some(end);
        Ok(())
    }

    pub fn set_interval(&mut self, choice: &str) -> Result<(), Validation> {
        self.interval = Some(select_interval(choice)?);
        Ok(())
    }

    pub fn set_location(&mut self, input: &str) -> Result<(), Validation> {
        self.save_dir = Some(resolve_directory(input)?);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.plan().is_some()
    }

    pub fn plan(&self) -> Option<DownloadPlan> {
        if self.tickers.is_empty() {
            return None;
        }
        Some(DownloadPlan {
            tickers: self.tickers.clone(),
            start: self.start?,
            end: self.end?,
            interval: self.interval?,
            save_dir: self.save_dir.clone()?,
        })
    }
}
