//! The `jobstamp -- CMD...` flow: resolve settings, stamp, replay.

use std::io::Write;

use jobstamp_cache::{StampOptions, Stamper};
use jobstamp_common::StampMethod;
use jobstamp_config::{load_config, StampConfig, Switches};

use crate::command::{CapturedOutput, CommandJob};
use crate::error::CommandError;
use crate::Cli;

/// Runs or replays the command named by `cli` and returns its exit code.
pub fn run(cli: &Cli) -> Result<i32, CommandError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => StampConfig::default(),
    };
    let switches = Switches::from_env().merge(&config.switches);
    crate::init_tracing(switches.debug);

    let output = stamp_command(cli, &config, switches)?;

    std::io::stdout().write_all(&output.stdout)?;
    std::io::stdout().flush()?;
    std::io::stderr().write_all(&output.stderr)?;
    Ok(output.code)
}

/// Stamps the command with settings from flags, then the file, then defaults.
pub fn stamp_command(
    cli: &Cli,
    config: &StampConfig,
    switches: Switches,
) -> Result<CapturedOutput, CommandError> {
    if cli.command.is_empty() {
        return Err(CommandError::EmptyCommand);
    }

    let mut stamper = Stamper::new(switches);
    if let Some(dir) = &config.cache.directory {
        stamper = stamper.with_default_cache_directory(dir);
    }
    if let Some(method) = config.cache.method {
        stamper = stamper.with_default_method(method);
    }

    let mut options = StampOptions::new()
        .dependencies(cli.dependencies.iter().cloned())
        .output_files(cli.output_files.iter().cloned());
    if let Some(dir) = &cli.stamp_directory {
        options = options.cache_directory(dir);
    }
    if cli.use_hashes {
        options = options.method(StampMethod::Hash);
    }

    tracing::debug!(
        target: "jobstamp",
        command = ?cli.command,
        method = %stamper.effective_method(&options),
        "stamping command"
    );
    stamper.run_job(CommandJob::new(cli.command.clone()), &options)
}
