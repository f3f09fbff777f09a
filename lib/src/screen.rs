//! The seams between the menu and the terminal: what gets shown and where
//! input lines come from.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    config::DownloadConfig,
    error::Validation,
    menu::State,
    service::{Outcome, Report},
};

pub trait Screen {
    /// Show the screen for `state`. `notice` is the input just rejected,
    /// if the state is being shown again because of it.
    fn render(
        &mut self,
        state: &State,
        config: &DownloadConfig,
        notice: Option<&Validation>,
    );

    fn download_started(&mut self, num_tickers: usize);

    /// Called once per ticker with its 1-based position in the batch.
    fn ticker_finished(&mut self, index: usize, ticker: &str, outcome: &Outcome);

    fn download_finished(&mut self, report: &Report);

    fn farewell(&mut self);
}

/// Line oriented user input.
#[allow(async_fn_in_trait)]
pub trait LineSource {
    /// The next line without its terminator, `None` once input is exhausted.
    async fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Lines from a buffered reader. Bytes that aren't UTF-8 are replaced
/// rather than failing the read, so a stray byte only spoils its own line.
pub struct ReaderLines<R> {
    reader: R,
}

impl<R: AsyncBufRead + Unpin> ReaderLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: AsyncBufRead + Unpin> LineSource for ReaderLines<R> {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
