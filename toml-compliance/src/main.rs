//! CLI entrypoint for `toml-compliance`.

use std::io::Write;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{WrapErr, eyre};

use toml_compliance::cli::Cli;
use toml_compliance::config::{Overrides, load_settings};
use toml_compliance::runner::{Mode, RunPlan, run_plan};
use toml_compliance::telemetry;

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    telemetry::init().map_err(|err| eyre!("failed to initialise logging: {err}"))?;

    let cli = Cli::parse();
    let Some(command) = cli.command.clone() else {
        Cli::command()
            .print_help()
            .wrap_err("failed to print usage")?;
        return Ok(ExitCode::from(1));
    };

    let overrides = Overrides::from(&cli);
    let settings = load_settings(cli.config.as_deref(), &overrides)?;
    let is_colored = settings.color.should_colorize();
    colored::control::set_override(is_colored);

    let plan = RunPlan::new(Mode::from(command), settings);
    let mut stdout = std::io::stdout().lock();
    let counters = run_plan(&plan, &mut stdout, is_colored)?;
    stdout.flush().wrap_err("failed to flush report")?;
    Ok(ExitCode::from(counters.exit_code()))
}
