use std::io::stdout;

use anyhow::Result;
use clap::{crate_version, value_parser, Arg, Command};
use clap_complete::{generate, Shell};

pub mod io;

pub mod progress;

mod subcommands;

pub mod traits;
use traits::TreeheadApp;

fn main() -> Result<()> {
    // Known subapplications.
    let apps = vec![
        subcommands::CollapseApp::app(),
        subcommands::ConvertApp::app(),
        subcommands::Tree2DepApp::app(),
        subcommands::ValidateApp::app(),
    ];

    env_logger::init();

    let cli = Command::new("treehead")
        .about("Constituency to dependency conversion with head rules")
        .version(crate_version!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(apps)
        .subcommand(
            Command::new("completions")
                .about("Generate completion scripts for your shell")
                .arg_required_else_help(true)
                .arg(Arg::new("shell").value_parser(value_parser!(Shell))),
        );
    let matches = cli.clone().get_matches();

    match matches.subcommand() {
        Some(("collapse", matches)) => subcommands::CollapseApp::parse(matches)?.run(),
        Some(("completions", matches)) => {
            let shell = matches
                .get_one::<Shell>("shell")
                .copied()
                .unwrap_or(Shell::Bash);
            write_completion_script(cli, shell);
            Ok(())
        }
        Some(("convert", matches)) => subcommands::ConvertApp::parse(matches)?.run(),
        Some(("tree2dep", matches)) => subcommands::Tree2DepApp::parse(matches)?.run(),
        Some(("validate", matches)) => subcommands::ValidateApp::parse(matches)?.run(),
        _ => unreachable!(),
    }
}

fn write_completion_script(mut cli: Command, shell: Shell) {
    generate(shell, &mut cli, "treehead", &mut stdout());
}
