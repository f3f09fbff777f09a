use std::{env, process};

use anyhow::Result;
use history_data::{
    client::Client, config::ClientConfig, menu::Controller, service::Service,
};
use tokio::signal;
use tracing_subscriber::{fmt, layer::SubscriberExt, prelude::*, EnvFilter};

mod terminal;

use terminal::{stdin_lines, Terminal};

#[tokio::main]
async fn main() -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(
        env::current_dir()?,
        "data-downloader.log",
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .with(EnvFilter::from_default_env())
        .init();

    let client = Client::new(&ClientConfig::default())?;
    let mut controller =
        Controller::new(Service::new(client), Terminal::default());
    let mut input = stdin_lines();

    let interrupted = tokio::select! {
        result = controller.run(&mut input) => {
            result?;
            false
        }
        _ = signal::ctrl_c() => true,
    };
    if interrupted {
        controller.interrupt().await;
        drop(guard);
        // a pending stdin read would keep the runtime from shutting down
        process::exit(0);
    }
    Ok(())
}
