use displaydoc::Display;
use reqwest::StatusCode;
use thiserror::Error;

use crate::types::HistoryRequestBuilderError;

#[derive(Debug, Display, Error)]
pub enum Error {
    /// Io: {0}
    File(#[from] FileIo),
    /// Error sending request: {0}
    SendRequest(reqwest::Error),
    /// Failed to read response: {0}
    Deserialization(reqwest::Error),
    /// Unexpected status code: {0}
    UnexpectedStatus(StatusCode),
    /// Failed to deserialize response: {0}
    Serde(#[from] serde_json::Error),
    /// Provider returned an error ({code}): {description}
    Provider { code: String, description: String },
    /// No data found for {0}
    NoData(String),
    /// Invalid history request: {0}
    InvalidRequest(#[from] HistoryRequestBuilderError),
    /// Error reading input: {0}
    Input(std::io::Error),
}

#[derive(Debug, Display, Error)]
pub enum Init {
    /// Failed to initialize the client: {0}
    ClientInitialization(reqwest::Error),
    /// Invalid user agent {0}
    InvalidUserAgent(String),
    /// Invalid base URL: {0}
    InvalidBaseUrl(String),
}

#[derive(Debug, Display, Error)]
pub enum FileIo {
    /// Error writing CSV: {0}
    Csv(#[from] csv::Error),
    /// Error writing file: {0}
    FileWrite(std::io::Error),
    /// Error creating file: {0}
    CreateFile(std::io::Error),
    /// Error creating directory: {0}
    CreateDir(std::io::Error),
}

/// Rejected user input. Recovered by prompting again.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// At least one ticker required.
    NoTickers,
    /// Invalid date format. Use DD-MM-YYYY.
    InvalidDate,
    /// Invalid choice.
    InvalidChoice,
    /// Path not valid.
    InvalidPath,
}
