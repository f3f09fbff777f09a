use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    config::ClientConfig,
    error::{self, Error},
    types::{Bar, HistoryRequest, Series},
};

/// A source of historical series.
#[allow(async_fn_in_trait)]
pub trait Provider {
    /// Human readable name of the instrument, if the provider knows one.
    async fn display_name(&self, ticker: &str) -> Result<Option<String>, Error>;

    async fn history(
        &self,
        request: &HistoryRequest<'_>,
    ) -> Result<Series, Error>;
}

/// Yahoo Finance chart API client.
#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
    base_url: Url,
}

impl Client {
    pub fn new(config: &ClientConfig) -> Result<Self, error::Init> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| {
                error::Init::InvalidBaseUrl(config.base_url.clone())
            })?;
        let user_agent =
            HeaderValue::from_str(&config.user_agent).map_err(|_| {
                error::Init::InvalidUserAgent(config.user_agent.clone())
            })?;
        let headers = HeaderMap::from_iter([
            (header::USER_AGENT, user_agent),
            (header::ACCEPT, HeaderValue::from_static("application/json")),
        ]);
        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(error::Init::ClientInitialization)?;
        Ok(Self { inner, base_url })
    }

    fn chart_url(&self, ticker: &str, query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        // checked to be a base in `new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", ticker]);
        }
        url.query_pairs_mut().extend_pairs(query);
        url
    }

    async fn get_chart(
        &self,
        ticker: &str,
        url: Url,
    ) -> Result<ChartData, Error> {
        let response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(Error::SendRequest)?;
        let status = response.status();
        let body = response.text().await.map_err(Error::Deserialization)?;
        debug!(status = %status, num_bytes = body.len(), "Got response");
        decode_chart(status, &body, ticker)
    }
}

/// Decodes a chart response body. A provider error object wins over the
/// status code; an unparseable body of a failed request is reported by its
/// status.
fn decode_chart(
    status: StatusCode,
    body: &str,
    ticker: &str,
) -> Result<ChartData, Error> {
    match serde_json::from_str::<ChartResponse>(body) {
        Ok(ChartResponse {
            chart:
                ChartResult {
                    error: Some(error),
                    ..
                },
        }) => Err(Error::Provider {
            code: error.code,
            description: error.description,
        }),
        _ if !status.is_success() => Err(Error::UnexpectedStatus(status)),
        Ok(response) => response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| Error::NoData(ticker.to_string())),
        Err(e) => Err(e.into()),
    }
}

impl Provider for Client {
    #[instrument(skip(self), err)]
    async fn display_name(&self, ticker: &str) -> Result<Option<String>, Error> {
        let url = self.chart_url(
            ticker,
            &[("range", "1d".to_string()), ("interval", "1d".to_string())],
        );
        let chart = self.get_chart(ticker, url).await?;
        Ok(chart.meta.name())
    }

    #[instrument(skip_all, err, fields(ticker = %request.ticker))]
    async fn history(
        &self,
        request: &HistoryRequest<'_>,
    ) -> Result<Series, Error> {
        let HistoryRequest {
            ticker,
            interval,
            start,
            end,
        } = request;
        let url = self.chart_url(
            ticker,
            &[
                ("period1", timestamp(*start).to_string()),
                ("period2", timestamp(*end).to_string()),
                ("interval", interval.to_string()),
                ("includeAdjustedClose", "true".to_string()),
            ],
        );
        let chart = self.get_chart(ticker, url).await?;
        let bars = chart.into_bars(ticker)?;
        debug!(num_bars = bars.len(), "Parsed series");
        Ok(Series {
            ticker: ticker.to_string(),
            bars,
        })
    }
}

fn timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct ChartData {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    short_name: Option<String>,
    long_name: Option<String>,
    /// Seconds east of UTC of the exchange the ticker trades on.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize, Default)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Quote {
    open: Vec<Option<Decimal>>,
    high: Vec<Option<Decimal>>,
    low: Vec<Option<Decimal>>,
    close: Vec<Option<Decimal>>,
    volume: Vec<Option<u64>>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct AdjClose {
    adjclose: Vec<Option<Decimal>>,
}

impl Meta {
    fn name(&self) -> Option<String> {
        [&self.short_name, &self.long_name]
            .into_iter()
            .flatten()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
            .map(String::from)
    }
}

fn cell(column: &[Option<Decimal>], i: usize) -> Option<Decimal> {
    column.get(i).copied().flatten()
}

impl ChartData {
    fn into_bars(self, ticker: &str) -> Result<Vec<Bar>, Error> {
        let timestamps = self
            .timestamp
            .ok_or_else(|| Error::NoData(ticker.to_string()))?;
        let quote =
            self.indicators.quote.into_iter().next().unwrap_or_default();
        let adjclose = self
            .indicators
            .adjclose
            .into_iter()
            .next()
            .unwrap_or_default()
            .adjclose;
        let offset = self.meta.gmtoffset;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.into_iter().enumerate() {
            let Some(date) = ts
                .checked_add(offset)
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
            else {
                warn!(timestamp = ts, "Skipping bar with invalid timestamp");
                continue;
            };
            let bar = Bar {
                date: date.date_naive(),
                open: cell(&quote.open, i),
                high: cell(&quote.high, i),
                low: cell(&quote.low, i),
                close: cell(&quote.close, i),
                adj_close: cell(&adjclose, i),
                volume: quote.volume.get(i).copied().flatten(),
            };
            // non-trading days come back with every cell null
            if bar.open.is_none()
                && bar.high.is_none()
                && bar.low.is_none()
                && bar.close.is_none()
                && bar.volume.is_none()
            {
                continue;
            }
            bars.push(bar);
        }

        if bars.is_empty() {
            return Err(Error::NoData(ticker.to_string()));
        }
        Ok(bars)
    }
}
