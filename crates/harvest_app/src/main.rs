mod config;
mod harvest;
mod logging;
mod persistence;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use harvest_engine::{SearchSettings, YoutubeSearchClient};
use harvest_logging::{harvest_error, harvest_info};

use crate::harvest::{Harvester, RunOutcome};
use crate::persistence::HarvestFiles;

const CONFIG_PATH: &str = "config.json";
/// Pause between successive pages of one keyword.
const PAGE_DELAY: Duration = Duration::from_millis(500);

fn main() -> ExitCode {
    logging::initialize(logging::LogDestination::Both);

    let config = match config::load(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            harvest_error!("failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run(config))
}

async fn run(config: config::Config) -> ExitCode {
    let client = match YoutubeSearchClient::new(SearchSettings::default()) {
        Ok(client) => client,
        Err(err) => {
            harvest_error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let files = HarvestFiles::new(config.state_file.clone(), config.output_file.clone());
    let mut state = files.load_state();
    let mut registry = files.load_channels();
    harvest_info!("loaded {} known channels", registry.len());

    let harvester = Harvester::new(&client, &files, config.max_results_per_keyword, PAGE_DELAY);
    match harvester
        .run(&config.keywords, &config.api_keys, &mut state, &mut registry)
        .await
    {
        Ok(RunOutcome::Completed) => {
            harvest_info!("harvesting completed for all keywords");
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::CredentialsExhausted) => {
            // Intentional halt: the pool is shared, so no keyword can make
            // progress until quotas reset. All progress is already durable.
            harvest_info!("all API keys are exhausted, stopping with progress saved");
            ExitCode::SUCCESS
        }
        Err(err) => {
            harvest_error!("failed to persist progress: {err}");
            ExitCode::FAILURE
        }
    }
}
