use std::{
    fs::File,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use csv::WriterBuilder;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    client::Provider,
    config::DownloadPlan,
    error::{self, Error},
    screen::Screen,
    types::{HistoryRequestBuilder, Series},
};

/// Name used in file names when the provider has none for a ticker.
pub const UNKNOWN_NAME: &str = "Unknown";

pub struct Service<P> {
    provider: P,
}

/// How one ticker of a batch went.
#[derive(Debug)]
pub enum Outcome {
    Saved { name: String, path: PathBuf },
    Failed(Error),
}

#[derive(Debug)]
pub struct TickerReport {
    pub ticker: String,
    pub outcome: Outcome,
}

/// Per ticker outcomes of a batch, in download order.
#[derive(Debug, Default)]
pub struct Report {
    pub tickers: Vec<TickerReport>,
}

impl Report {
    pub fn num_saved(&self) -> usize {
        self.tickers
            .iter()
            .filter(|t| matches!(t.outcome, Outcome::Saved { .. }))
            .count()
    }

    pub fn num_failed(&self) -> usize {
        self.tickers.len() - self.num_saved()
    }
}

impl<P: Provider> Service<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Downloads every ticker of the plan one after the other. A failing
    /// ticker is reported and skipped, it never stops the batch.
    #[instrument(skip_all)]
    pub async fn download(
        &self,
        plan: &DownloadPlan,
        screen: &mut impl Screen,
    ) -> Report {
        info!(
            num_tickers = plan.tickers.len(),
            interval = %plan.interval,
            save_dir = ?plan.save_dir,
            start = %plan.start,
            end = %plan.end,
            "Starting to fetch data..."
        );
        screen.download_started(plan.tickers.len());

        let mut report = Report::default();
        for (i, ticker) in plan.tickers.iter().enumerate() {
            info!(ticker = %ticker, "Fetching data for ticker");
            let outcome = match self.save_series_to_disk(ticker, plan).await {
                Ok((name, path)) => Outcome::Saved { name, path },
                Err(e) => {
                    error!(error = %e, ticker = %ticker, "Encountered an error when processing a ticker");
                    Outcome::Failed(e)
                }
            };
            screen.ticker_finished(i + 1, ticker, &outcome);
            report.tickers.push(TickerReport {
                ticker: ticker.clone(),
                outcome,
            });
        }

        screen.download_finished(&report);
        info!(
            num_saved = report.num_saved(),
            num_failed = report.num_failed(),
            "Finished fetching data!"
        );
        report
    }

    async fn resolve_name(&self, ticker: &str) -> String {
        match self.provider.display_name(ticker).await {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_NAME.to_string(),
            Err(e) => {
                warn!(error = %e, "Could not look up name, using fallback");
                UNKNOWN_NAME.to_string()
            }
        }
    }

    #[instrument(skip(self, plan), err)]
    async fn save_series_to_disk(
        &self,
        ticker: &str,
        plan: &DownloadPlan,
    ) -> Result<(String, PathBuf), Error> {
        let name = self.resolve_name(ticker).await;
        let request = HistoryRequestBuilder::default()
            .ticker(ticker)
            .interval(plan.interval)
            .start(plan.start)
            .end(plan.end)
            .build()?;
        let series = self.provider.history(&request).await?;

        let file_path = plan
            .save_dir
            .join(file_name(&name, ticker, plan.start, plan.end));
        fs::create_dir_all(&plan.save_dir)
            .await
            .map_err(error::FileIo::CreateDir)?;
        write_series(&file_path, &series)?;
        debug!(num_bars = series.bars.len(), path = ?file_path, "Saved series");
        Ok((name, file_path))
    }
}

/// `<name>_<ticker>_<start>_to_<end>.csv`, with the characters that don't
/// belong in a file name replaced or dropped.
pub fn file_name(
    name: &str,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> String {
    let name: String = name
        .chars()
        .filter(|c| !matches!(c, ',' | ':'))
        .map(|c| if matches!(c, ' ' | '/') { '_' } else { c })
        .collect();
    let ticker: String =
        ticker.chars().filter(|c| !matches!(c, '=' | '^')).collect();
    format!("{name}_{ticker}_{start}_to_{end}.csv")
}

fn write_series(path: &Path, series: &Series) -> Result<(), error::FileIo> {
    let file = File::create(path).map_err(error::FileIo::CreateFile)?;
    let mut writer = WriterBuilder::new().from_writer(file);
    for bar in &series.bars {
        writer.serialize(bar)?;
    }
    writer.flush().map_err(error::FileIo::FileWrite)
}
