use std::io::{BufRead, BufWriter, Write};

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use conllu::io::{WriteSentence, Writer};
use log::warn;
use stdinout::{Input, Output};
use treehead::dependency::{DependencyExtractor, MissingHeadCounter};
use treehead::head::HeadFinder;
use treehead::tree::ParseTree;

use crate::io::{load_head_finder, open_input};
use crate::progress::ConversionStats;
use crate::subcommands::convert::log_missing_heads;
use crate::traits::TreeheadApp;

const INPUT: &str = "INPUT";
const OUTPUT: &str = "OUTPUT";
const RULES: &str = "RULES";

pub struct Tree2DepApp {
    input: Option<String>,
    output: Option<String>,
    rules: Option<String>,
}

impl Tree2DepApp {
    fn convert<F, R, W>(&self, extractor: DependencyExtractor<F>, read: R, mut write: W) -> Result<()>
    where
        F: HeadFinder,
        R: BufRead,
        W: Write,
    {
        let mut writer = Writer::new(&mut write);
        let mut counter = MissingHeadCounter::default();
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

            let dependencies = extractor
                .extract_with(tree.n_leaves(), &tree, &mut counter)
                .context(format!("Cannot extract dependencies on line {}", idx + 1))?;

            // Tags are only available when every leaf has a preterminal.
            let (words, tags) = tree.words_and_tags();
            let sentence = if words.len() == dependencies.len() {
                dependencies.to_sentence(&words, Some(tags.as_slice()))
            } else {
                let leaves: Vec<_> = tree
                    .leaves()
                    .into_iter()
                    .map(|leaf| tree.label(leaf))
                    .collect();
                dependencies.to_sentence(&leaves, None::<&[&str]>)
            }
            .context(format!("Cannot construct dependency graph on line {}", idx + 1))?;

            writer
                .write_sentence(&sentence)
                .context("Cannot write sentence")?;
            stats.count_sentence();
        }

        write.flush().context("Cannot flush output")?;

        log_missing_heads(&counter);

        Ok(())
    }
}

impl TreeheadApp for Tree2DepApp {
    fn app() -> Command {
        Command::new("tree2dep")
            .about("Convert bracketed trees (one per line) to CoNLL-U dependencies")
            .arg(
                Arg::new(RULES)
                    .long("rules")
                    .value_name("FILE")
                    .num_args(1)
                    .help("Head finder configuration"),
            )
            .arg(Arg::new(INPUT).help("Input trees").index(1))
            .arg(Arg::new(OUTPUT).help("Output data").index(2))
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Tree2DepApp {
            input: matches.get_one::<String>(INPUT).map(ToOwned::to_owned),
            output: matches.get_one::<String>(OUTPUT).map(ToOwned::to_owned),
            rules: matches.get_one::<String>(RULES).map(ToOwned::to_owned),
        })
    }

    fn run(&self) -> Result<()> {
        let head_finder = load_head_finder(self.rules.as_deref())?;

        let input = Input::from(self.input.as_ref());
        let read = open_input(&input, self.input.as_ref())?;

        let output = Output::from(self.output.as_ref());
        let write = BufWriter::new(output.write().context("Cannot open output for writing")?);

        self.convert(DependencyExtractor::new(&head_finder), read, write)
    }
}
