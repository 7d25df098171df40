//! BundleBD CLI entry point: argument parsing, logging setup and command
//! dispatch.

use bundlebd_cli::{cli, commands, error, logger, ui};
use clap::Parser;
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    run(args).await.map_err(error::cli_error_to_miette)
}

async fn run(args: cli::Cli) -> error::Result<()> {
    let cwd = commands::utils::resolve_cwd(args.cwd.as_deref())?;

    match args.command {
        cli::Command::Bundle(bundle_args) => commands::bundle_execute(bundle_args, &cwd).await,
        cli::Command::Plan(plan_args) => commands::plan_execute(plan_args, &cwd).await,
        cli::Command::Build(build_args) => commands::build_execute(build_args, &cwd).await,
    }
}
