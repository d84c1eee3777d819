use anyhow::{bail, Context, Result};
use clap::Parser;
use indexer_testkit::config::{LogFormat, LoggingSettings, Settings};
use indexer_testkit::{Fixture, TestEnvironment};
use std::path::PathBuf;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

/// Run indexer fixtures against the in-memory mock store
#[derive(Debug, Parser)]
#[command(name = "indexer_testkit", version, about)]
struct Cli {
    /// Extra configuration file layered over config/ and the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixture files to run
    #[arg(required = true)]
    fixtures: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("loading settings")?;

    init_tracing(&settings.logging);

    info!(fixtures = cli.fixtures.len(), "Starting indexer fixture run");

    let failed = run_fixtures(&settings, &cli.fixtures).await;
    if failed > 0 {
        bail!("{failed} of {} fixtures failed", cli.fixtures.len());
    }

    info!("All fixtures passed");
    Ok(())
}

fn init_tracing(logging: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
}

#[instrument(skip_all)]
async fn run_fixtures(settings: &Settings, paths: &[PathBuf]) -> usize {
    let mut failed = 0;

    for path in paths {
        let outcome = match Fixture::load(path) {
            Ok(fixture) => {
                let mut env = TestEnvironment::from_settings(&settings.harness);
                fixture.run(&mut env).await.map(|_| ())
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => info!(path = %path.display(), "PASS"),
            Err(err) => {
                failed += 1;
                warn!(path = %path.display(), "FAIL: {err}");
            }
        }
    }

    failed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failed_fixtures_are_counted_and_the_run_continues() {
        let passing = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/basic_transfers.json");
        let paths = vec![
            PathBuf::from("/nonexistent/fixture.json"),
            PathBuf::from(passing),
        ];

        let failed = run_fixtures(&Settings::default(), &paths).await;

        assert_eq!(failed, 1);
    }
}
