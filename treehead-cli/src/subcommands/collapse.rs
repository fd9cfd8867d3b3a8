use std::io::{BufRead, BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::warn;
use stdinout::{Input, Output};
use treehead::tree::ParseTree;

use crate::io::open_input;
use crate::progress::ConversionStats;
use crate::traits::TreeheadApp;

const ALL: &str = "ALL";
const APPEND_LABELS: &str = "APPEND_LABELS";
const INPUT: &str = "INPUT";
const OUTPUT: &str = "OUTPUT";

pub struct CollapseApp {
    all: bool,
    append_labels: bool,
    input: Option<String>,
    output: Option<String>,
}

impl CollapseApp {
    fn collapse<R, W>(&self, read: R, mut write: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        let mut stats = ConversionStats::new();

        for (idx, line) in read.lines().enumerate() {
            let line = line.context("Cannot read line")?;
            if line.trim().is_empty() {
                continue;
            }

            let tree: ParseTree = match line.parse() {
                Ok(tree) => tree,
                Err(err) => {
                    warn!("Skipping malformed tree on line {}: {}", idx + 1, err);
                    stats.count_malformed();
                    continue;
                }
            };

            let collapsed = tree.collapse_singleton_spines(!self.all, self.append_labels);
            writeln!(write, "{}", collapsed).context("Cannot write tree")?;
            stats.count_sentence();
        }

        write.flush().context("Cannot flush output")
    }
}

impl TreeheadApp for CollapseApp {
    fn app() -> Command {
        Command::new("collapse")
            .about("Collapse unary chains in bracketed trees (one per line)")
            .arg(
                Arg::new(ALL)
                    .long("all")
                    .action(ArgAction::SetTrue)
                    .help("Collapse unary nodes regardless of their labels"),
            )
            .arg(
                Arg::new(APPEND_LABELS)
                    .long("append-labels")
                    .action(ArgAction::SetTrue)
                    .requires(ALL)
                    .help("Join the labels of collapsed nodes with '|'"),
            )
            .arg(Arg::new(INPUT).help("Input trees").index(1))
            .arg(Arg::new(OUTPUT).help("Output trees").index(2))
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(CollapseApp {
            all: matches.get_flag(ALL),
            append_labels: matches.get_flag(APPEND_LABELS),
            input: matches.get_one::<String>(INPUT).map(ToOwned::to_owned),
            output: matches.get_one::<String>(OUTPUT).map(ToOwned::to_owned),
        })
    }

    fn run(&self) -> Result<()> {
        let input = Input::from(self.input.as_ref());
        let read = open_input(&input, self.input.as_ref())?;

        let output = Output::from(self.output.as_ref());
        let write = BufWriter::new(output.write().context("Cannot open output for writing")?);
        self.collapse(read, write)
    }
}
