use clap::Parser;
use tracing::{debug, error, trace, warn};

use eadirm_rs::config::Config;
use eadirm_rs::{
    CLIArgs, SweepPipeline, create_pipeline_cancellation_token, exit_code_from_error,
    is_cancelled_error,
};

mod ctrl_c_handler;
mod tracing_init;

/// eadirm - remove Synology @eaDir metadata directories over ssh.
///
/// This binary is a thin wrapper over the eadirm-rs library.
/// All core functionality is implemented in the library crate.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = load_config_exit_if_err();

    start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    std::process::exit(run(config).await);
}

fn load_config_exit_if_err() -> Config {
    let config = Config::try_from(CLIArgs::parse());
    if let Err(error_message) = config {
        clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit();
    }
    config.unwrap()
}

fn start_tracing_if_necessary(config: &Config) -> bool {
    if config.tracing_config.is_none() {
        return false;
    }

    tracing_init::init_tracing(config.tracing_config.as_ref().unwrap());
    true
}

async fn run(config: Config) -> i32 {
    let cancellation_token = create_pipeline_cancellation_token();

    ctrl_c_handler::spawn_ctrl_c_handler(cancellation_token.clone());

    let start_time = tokio::time::Instant::now();
    debug!("sweep pipeline start.");

    let mut pipeline = SweepPipeline::new(config, cancellation_token);
    let result = pipeline.run().await;

    let duration_sec = format!("{:.3}", start_time.elapsed().as_secs_f32());
    let stats = pipeline.stats();

    match result {
        Ok(()) => {
            debug!(
                duration_sec = duration_sec,
                deleted = stats.deleted,
                "eadirm has been completed."
            );
            0
        }
        Err(err) => {
            if is_cancelled_error(&err) {
                warn!(
                    deleted = stats.deleted,
                    remaining = stats.remaining,
                    "sweep cancelled by user."
                );
            } else {
                error!("{err}");
                error!(duration_sec = duration_sec, "eadirm failed.");
            }
            exit_code_from_error(&err)
        }
    }
}
