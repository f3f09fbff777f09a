//! The interactive menu as a state machine.
//!
//! [`transition`] decides everything from the current state and one input,
//! without touching the terminal. [`Controller`] feeds it lines from a
//! [`LineSource`] and carries out the resulting effects through a [`Screen`].

use tracing::{debug, info};

use crate::{
    client::Provider,
    config::{DownloadConfig, DownloadPlan},
    error::{Error, Validation},
    screen::{LineSource, Screen},
    service::Service,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    MainMenu,
    SettingTickers,
    /// Asking for the start date, then for the end date once `start` holds
    /// the first answer.
    SettingDates {
        start: Option<String>,
    },
    SettingInterval,
    SettingLocation,
    /// A batch has been downloaded, waiting for the user to acknowledge it.
    Downloading,
    IncompleteWarning,
    Exited,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    EndOfInput,
    Interrupt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Input was rejected, the state is shown again.
    Notice(Validation),
    Download(DownloadPlan),
    Farewell,
}

/// Main menu choices, after trimming and upper casing.
mod choice {
    pub const TICKERS: &str = "1";
    pub const DATES: &str = "2";
    pub const INTERVAL: &str = "3";
    pub const LOCATION: &str = "4";
    pub const EXIT: &str = "5";
    pub const START: &str = "";
}

pub fn transition(
    state: &State,
    input: Input,
    config: &mut DownloadConfig,
) -> (State, Vec<Effect>) {
    if *state == State::Exited {
        return (State::Exited, vec![]);
    }
    let line = match input {
        Input::Line(line) => line,
        Input::EndOfInput | Input::Interrupt => {
            return (State::Exited, vec![Effect::Farewell])
        }
    };

    match state {
        State::MainMenu => main_menu(&line, config),
        State::SettingTickers => setter(state, config.set_tickers(&line)),
        State::SettingDates { start: None } => {
            (State::SettingDates { start: Some(line) }, vec![])
        }
        State::SettingDates { start: Some(start) } => {
            match config.set_dates(start, &line) {
                Ok(()) => (State::MainMenu, vec![]),
                Err(e) => (
                    State::SettingDates { start: None },
                    vec![Effect::Notice(e)],
                ),
            }
        }
        State::SettingInterval => setter(state, config.set_interval(&line)),
        State::SettingLocation => setter(state, config.set_location(&line)),
        State::Downloading => (State::MainMenu, vec![]),
        State::IncompleteWarning => match line.trim() {
            "1" => (State::MainMenu, vec![]),
            "2" => (State::Exited, vec![Effect::Farewell]),
            _ => (State::IncompleteWarning, vec![]),
        },
        State::Exited => (State::Exited, vec![]),
    }
}

fn main_menu(line: &str, config: &DownloadConfig) -> (State, Vec<Effect>) {
    match line.trim().to_uppercase().as_str() {
        choice::TICKERS => (State::SettingTickers, vec![]),
        choice::DATES => (State::SettingDates { start: None }, vec![]),
        choice::INTERVAL => (State::SettingInterval, vec![]),
        choice::LOCATION => (State::SettingLocation, vec![]),
        choice::EXIT => (State::Exited, vec![Effect::Farewell]),
        choice::START => match config.plan() {
            Some(plan) => (State::Downloading, vec![Effect::Download(plan)]),
            None => (State::IncompleteWarning, vec![]),
        },
        // unknown keys get the same treatment as an incomplete start
        _ => (State::IncompleteWarning, vec![]),
    }
}

/// Setters stay put until their input validates.
fn setter(
    state: &State,
    result: Result<(), Validation>,
) -> (State, Vec<Effect>) {
    match result {
        Ok(()) => (State::MainMenu, vec![]),
        Err(e) => (state.clone(), vec![Effect::Notice(e)]),
    }
}

pub struct Controller<P, S> {
    config: DownloadConfig,
    state: State,
    notice: Option<Validation>,
    service: Service<P>,
    screen: S,
}

impl<P: Provider, S: Screen> Controller<P, S> {
    pub fn new(service: Service<P>, screen: S) -> Self {
        Self {
            config: DownloadConfig::default(),
            state: State::MainMenu,
            notice: None,
            service,
            screen,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Runs the menu until the user exits or input runs out.
    pub async fn run(&mut self, input: &mut impl LineSource) -> Result<(), Error> {
        info!("Menu started");
        while self.state != State::Exited {
            self.screen
                .render(&self.state, &self.config, self.notice.as_ref());
            self.notice = None;
            let input = match input.next_line().await.map_err(Error::Input)? {
                Some(line) => Input::Line(line),
                None => Input::EndOfInput,
            };
            self.apply(input).await;
        }
        info!("Menu exited");
        Ok(())
    }

    /// Leaves the menu from wherever it is, saying goodbye.
    pub async fn interrupt(&mut self) {
        info!("Interrupted");
        self.apply(Input::Interrupt).await;
    }

    async fn apply(&mut self, input: Input) {
        let (next, effects) = transition(&self.state, input, &mut self.config);
        debug!(from = ?self.state, to = ?next, "Transition");
        self.state = next;
        for effect in effects {
            match effect {
                Effect::Notice(notice) => self.notice = Some(notice),
                Effect::Download(plan) => {
                    self.service.download(&plan, &mut self.screen).await;
                }
                Effect::Farewell => self.screen.farewell(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::Interval;

    fn line(s: &str) -> Input {
        Input::Line(s.to_string())
    }

    fn complete() -> DownloadConfig {
        let mut config = DownloadConfig::default();
        config.set_tickers("AAPL,MSFT").unwrap();
        config.set_dates("01-01-2020", "31-12-2020").unwrap();
        config.set_interval("a").unwrap();
        config.set_location("").unwrap();
        config
    }

    #[test]
    fn menu_options_open_setters() {
        let mut config = DownloadConfig::default();
        let cases = [
            ("1", State::SettingTickers),
            (" 2 ", State::SettingDates { start: None }),
            ("3", State::SettingInterval),
            ("4", State::SettingLocation),
        ];
        for (input, expected) in cases {
            let (next, effects) =
                transition(&State::MainMenu, line(input), &mut config);
            assert_eq!(next, expected);
            assert!(effects.is_empty());
        }
    }

    #[test]
    fn exit_and_end_of_input_say_goodbye() {
        let mut config = DownloadConfig::default();
        for (state, input) in [
            (State::MainMenu, line("5")),
            (State::MainMenu, Input::EndOfInput),
            (State::SettingTickers, Input::EndOfInput),
            (State::SettingDates { start: Some("x".into()) }, Input::Interrupt),
            (State::Downloading, Input::Interrupt),
            (State::IncompleteWarning, line("2")),
        ] {
            let (next, effects) = transition(&state, input, &mut config);
            assert_eq!(next, State::Exited);
            assert_eq!(effects, vec![Effect::Farewell]);
        }
        let (next, effects) =
            transition(&State::Exited, Input::Interrupt, &mut config);
        assert_eq!(next, State::Exited);
        assert!(effects.is_empty());
    }

    #[test]
    fn start_requires_complete_config() {
        let mut config = DownloadConfig::default();
        let (next, effects) =
            transition(&State::MainMenu, line(""), &mut config);
        assert_eq!(next, State::IncompleteWarning);
        assert!(effects.is_empty());

        let mut config = complete();
        let plan = config.plan().unwrap();
        let (next, effects) =
            transition(&State::MainMenu, line("  "), &mut config);
        assert_eq!(next, State::Downloading);
        assert_eq!(effects, vec![Effect::Download(plan)]);
    }

    #[test]
    fn unknown_key_warns_even_when_complete() {
        let mut config = complete();
        for input in ["x", "6", "start"] {
            let (next, effects) =
                transition(&State::MainMenu, line(input), &mut config);
            assert_eq!(next, State::IncompleteWarning);
            assert!(effects.is_empty());
        }
    }

    #[test]
    fn warning_only_leaves_to_menu_or_exit() {
        let mut config = DownloadConfig::default();
        let (next, _) =
            transition(&State::IncompleteWarning, line("3"), &mut config);
        assert_eq!(next, State::IncompleteWarning);
        let (next, _) =
            transition(&State::IncompleteWarning, line(""), &mut config);
        assert_eq!(next, State::IncompleteWarning);
        let (next, _) =
            transition(&State::IncompleteWarning, line(" 1"), &mut config);
        assert_eq!(next, State::MainMenu);
    }

    #[test]
    fn setters_reprompt_until_valid() {
        let mut config = DownloadConfig::default();
        let (next, effects) =
            transition(&State::SettingTickers, line(" , "), &mut config);
        assert_eq!(next, State::SettingTickers);
        assert_eq!(effects, vec![Effect::Notice(Validation::NoTickers)]);

        let (next, effects) =
            transition(&State::SettingInterval, line("d"), &mut config);
        assert_eq!(next, State::SettingInterval);
        assert_eq!(effects, vec![Effect::Notice(Validation::InvalidChoice)]);

        let (next, effects) = transition(
            &State::SettingLocation,
            line("/definitely/not/here"),
            &mut config,
        );
        assert_eq!(next, State::SettingLocation);
        assert_eq!(effects, vec![Effect::Notice(Validation::InvalidPath)]);
        assert_eq!(config, DownloadConfig::default());

        let (next, _) =
            transition(&State::SettingInterval, line("B"), &mut config);
        assert_eq!(next, State::MainMenu);
        assert_eq!(config.interval, Some(Interval::Weekly));
    }

    #[test]
    fn dates_take_two_lines() {
        let mut config = DownloadConfig::default();
        let state = State::SettingDates { start: None };
        let (state, _) = transition(&state, line("01-01-2020"), &mut config);
        assert_eq!(
            state,
            State::SettingDates {
                start: Some("01-01-2020".into())
            }
        );
        assert_eq!(config.start, None);

        let (next, effects) = transition(&state, line("31-12-2020"), &mut config);
        assert_eq!(next, State::MainMenu);
        assert!(effects.is_empty());
        assert_eq!(config.start, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(config.end, NaiveDate::from_ymd_opt(2020, 12, 31));
    }

    #[test]
    fn bad_dates_restart_and_keep_old_values() {
        let mut config = complete();
        let before = config.clone();
        let state = State::SettingDates {
            start: Some("01-01-2021".into()),
        };
        let (next, effects) = transition(&state, line("31/12/2021"), &mut config);
        assert_eq!(next, State::SettingDates { start: None });
        assert_eq!(effects, vec![Effect::Notice(Validation::InvalidDate)]);
        assert_eq!(config, before);
    }

    #[test]
    fn acknowledging_a_download_returns_to_menu() {
        let mut config = complete();
        let (next, effects) =
            transition(&State::Downloading, line("anything"), &mut config);
        assert_eq!(next, State::MainMenu);
        assert!(effects.is_empty());
    }
}
