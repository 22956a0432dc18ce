#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::time::Duration;

use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::models::GenerationPolicy;
use infrastructure::backends::BackendManager;
use owo_colors::OwoColorize;
use tokio::sync::mpsc;
use tokio::task;

use crate::application::cli;
use crate::application::cli::Mode;
use crate::application::headless;
use crate::application::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::Orchestrator;
use crate::domain::services::OrchestratorOptions;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        format!(
            "Oh no! menuviz has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        )
        .red()
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    if !env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("menuviz")
    {
        return None;
    }

    let debug_log_dir = match cli::log_dir() {
        Ok(dir) => dir,
        Err(_) => return None,
    };

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(writer)
        .init();

    return Some(guard);
}

fn orchestrator_options() -> Result<OrchestratorOptions> {
    let policy_str = Config::get(ConfigKey::GenerationPolicy);
    let policy = match GenerationPolicy::parse(&policy_str) {
        Some(policy) => policy,
        None => anyhow::bail!(format!("Unknown generation policy '{policy_str}'")),
    };

    return Ok(OrchestratorOptions {
        policy,
        timeout: Duration::from_millis(Config::get_millis(ConfigKey::RequestTimeout)?),
    });
}

async fn run(mode: Mode) -> Result<bool> {
    Config::get_millis(ConfigKey::HealthCheckTimeout)?;
    let options = orchestrator_options()?;

    let extractor = BackendManager::get_extractor();
    let generator = BackendManager::get_image_generator();
    extractor.health_check().await?;
    generator.health_check().await?;

    let (orchestrator, mut completion_rx) = Orchestrator::new(extractor, generator, options);
    let snapshots = orchestrator.subscribe();
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return orchestrator.start(&mut action_rx, &mut completion_rx).await;
    });

    if mode == Mode::Headless {
        return tokio::select!(
            res = background_futures.join_next() => match res {
                Some(res) => res?.map(|_| return false),
                None => Ok(false),
            },
            res = headless::start(action_tx, snapshots) => res,
        );
    }

    let res = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(res) => res?,
            None => Ok(()),
        },
        res = ui::start(action_tx, snapshots) => res,
    );

    if res.is_err() {
        ui::destruct_terminal_for_panic();
    }
    res?;

    return Ok(true);
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let _guard = init_logging();

    let mode = match cli::parse().await {
        Ok(mode) => mode,
        Err(err) => {
            handle_error(err);
            return;
        }
    };
    if mode == Mode::Exit {
        process::exit(0);
    }

    let code = match run(mode).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            drop(_guard);
            handle_error(err);
            return;
        }
    };

    drop(_guard);
    process::exit(code);
}
