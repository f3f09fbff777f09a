use std::io::{self, Write};

use history_data::{
    config::DownloadConfig,
    error::Validation,
    menu::State,
    screen::{ReaderLines, Screen},
    service::{Outcome, Report},
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{BufReader, Stdin};

const TITLE: &str = "Data Downloader";
const SUMMARY: &str = "Configuration Summary";
const RULE_WIDTH: usize = 40;
const NOT_SET: &str = "Not set";

/// Plain text menu on stdout.
#[derive(Default)]
pub struct Terminal {
    progress: Option<ProgressBar>,
}

impl Terminal {
    fn clear(&self) {
        print!("\x1B[2J\x1B[1;1H");
        let rule = "*".repeat(RULE_WIDTH);
        println!("{rule}\nHistorical price downloader\nYahoo Finance to CSV\n{rule}");
    }

    fn prompt(&self, text: &str) {
        print!("{text}");
        let _ = io::stdout().flush();
    }

    fn main_menu(&self, config: &DownloadConfig) {
        let rule = "=".repeat(RULE_WIDTH);
        println!("{rule}\n{TITLE}\n{rule}\n");
        println!("(1) Set Tickers");
        println!("(2) Set Date Range");
        println!("(3) Set Interval");
        println!("(4) Set Save Location");
        println!("(5) Exit\n");

        let rule = "-".repeat(RULE_WIDTH);
        println!("{rule}\n{SUMMARY}\n{rule}");
        let tickers = if config.tickers.is_empty() {
            NOT_SET.to_string()
        } else {
            config.tickers.join(", ")
        };
        println!("Tickers: {tickers}");
        println!("Start Date: {}", or_not_set(config.start));
        println!("End Date: {}", or_not_set(config.end));
        println!("Interval: {}", or_not_set(config.interval));
        println!(
            "Save Location: {}",
            or_not_set(config.save_dir.as_ref().map(|dir| dir.display()))
        );
        println!("{rule}");
        self.prompt("\nChoose option or press ENTER to download: \n");
    }
}

fn or_not_set(value: Option<impl ToString>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| NOT_SET.to_string())
}

impl Screen for Terminal {
    fn render(
        &mut self,
        state: &State,
        config: &DownloadConfig,
        notice: Option<&Validation>,
    ) {
        match state {
            State::Downloading => {
                self.prompt("\nPress ENTER to return to the main menu...");
                return;
            }
            // the end date is asked right below the start date
            State::SettingDates { start: Some(_) } => {
                self.prompt("Enter END date (DD-MM-YYYY): ");
                return;
            }
            State::Exited => return,
            _ => {}
        }

        self.clear();
        if let Some(notice) = notice {
            println!("{notice}\n");
        }
        match state {
            State::MainMenu => self.main_menu(config),
            State::SettingTickers => {
                println!("Enter Yahoo Finance codes separated by comma (,)");
                println!("Example: GC=F,^GSPC,AAPL");
                self.prompt("Tickers: ");
            }
            State::SettingDates { .. } => {
                self.prompt("Enter START date (DD-MM-YYYY): ");
            }
            State::SettingInterval => {
                println!("Choose interval");
                println!("(a) 1d");
                println!("(b) 1wk");
                println!("(c) 1mo");
                self.prompt("Enter option (a/b/c): ");
            }
            State::SettingLocation => {
                println!("Choose path or leave it empty to save in the current directory");
                self.prompt("Directory: ");
            }
            State::IncompleteWarning => {
                println!("Configuration incomplete. Please set all required fields.\n");
                println!("(1) Main Menu");
                println!("(2) Exit");
                self.prompt("\nChoose option: ");
            }
            State::Downloading | State::Exited => {}
        }
    }

    fn download_started(&mut self, num_tickers: usize) {
        self.clear();
        println!("Start downloading...\n");
        self.progress =
            Some(ProgressBar::new(num_tickers as u64).with_style(style()));
    }

    fn ticker_finished(&mut self, index: usize, ticker: &str, outcome: &Outcome) {
        let line = match outcome {
            Outcome::Saved { name, .. } => format!("{index}) {name}... done"),
            Outcome::Failed(e) => format!("{index}) Error with {ticker}: {e}"),
        };
        match &self.progress {
            Some(progress) => {
                progress.println(line);
                progress.inc(1);
            }
            None => println!("{line}"),
        }
    }

    fn download_finished(&mut self, report: &Report) {
        if let Some(progress) = self.progress.take() {
            progress.finish_and_clear();
        }
        println!(
            "\n{} of {} tickers saved.",
            report.num_saved(),
            report.tickers.len()
        );
    }

    fn farewell(&mut self) {
        self.clear();
        println!("Thank you for using the Data Downloader.");
        println!("Wishing you accurate data and insightful research!\n");
    }
}

fn style() -> ProgressStyle {
    ProgressStyle::with_template(
        "[{elapsed}] {bar:40.cyan/blue} {pos:>4}/{len:4} {percent}% {msg}",
    )
    .expect("always valid if tests pass")
}

/// Lines typed on stdin.
pub type StdinLines = ReaderLines<BufReader<Stdin>>;

pub fn stdin_lines() -> StdinLines {
    ReaderLines::new(BufReader::new(tokio::io::stdin()))
}

#[cfg(test)]
mod tests {
    use super::{or_not_set, style};

    #[test]
    fn style_is_valid() {
        let _ = style();
    }

    #[test]
    fn missing_values_read_not_set() {
        assert_eq!(or_not_set(None::<&str>), "Not set");
        assert_eq!(or_not_set(Some("1wk")), "1wk");
    }
}
