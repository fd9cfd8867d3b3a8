use std::io::{BufRead, BufWriter, Write};

use anyhow::{bail, Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use conllu::io::{WriteSentence, Writer};
use log::warn;
use stdinout::{Input, Output};
use treehead::conll::{
    Block, ColumnLayout, ColumnSentence, ConllError, ConllReader, ConllWriter,
};
use treehead::dependency::{Dependencies, DependencyExtractor, MissingHeadCounter};
use treehead::head::HeadFinder;

use crate::io::{load_head_finder, open_input};
use crate::progress::ConversionStats;
use crate::traits::TreeheadApp;

const FORMAT: &str = "FORMAT";
const INPUT: &str = "INPUT";
const NO_ESCAPE: &str = "NO_ESCAPE";
const OUTPUT: &str = "OUTPUT";
const PARSE_COLUMN: &str = "PARSE_COLUMN";
const RULES: &str = "RULES";
const TAG_COLUMN: &str = "TAG_COLUMN";
const WORD_COLUMN: &str = "WORD_COLUMN";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum OutputFormat {
    Columns,
    Conllu,
}

pub struct ConvertApp {
    escape: bool,
    format: OutputFormat,
    input: Option<String>,
    layout: ColumnLayout,
    output: Option<String>,
    rules: Option<String>,
}

impl ConvertApp {
    fn extract<F>(
        &self,
        extractor: &DependencyExtractor<F>,
        sentence: &ColumnSentence,
        counter: &mut MissingHeadCounter,
        stats: &mut ConversionStats,
    ) -> Option<Dependencies>
    where
        F: HeadFinder,
    {
        let tree = match sentence.parse_tree(self.escape) {
            Ok(tree) => tree,
            Err(err) => {
                warn!(
                    "Skipping sentence with malformed tree: {}: {}",
                    sentence.tree_description(self.escape),
                    err
                );
                stats.count_malformed();
                return None;
            }
        };

        match extractor.extract_with(sentence.len(), &tree, counter) {
            Ok(dependencies) => {
                stats.count_sentence();
                Some(dependencies)
            }
            Err(err) => {
                warn!("Skipping sentence: {}: {}", tree, err);
                stats.count_malformed();
                None
            }
        }
    }

    fn write_columns<F, R, W>(&self, extractor: DependencyExtractor<F>, read: R, write: W) -> Result<()>
    where
        F: HeadFinder,
        R: BufRead,
        W: Write,
    {
        let mut writer = ConllWriter::new(write);
        let mut counter = MissingHeadCounter::default();
        let mut stats = ConversionStats::new();

        for block in ConllReader::new(read, self.layout) {
            match read_block(block, &mut stats)? {
                Some(Block::Marker(marker)) => writer
                    .write_marker(&marker)
                    .context("Cannot write document marker")?,
                Some(Block::Sentence(sentence)) => {
                    let dependencies =
                        self.extract(&extractor, &sentence, &mut counter, &mut stats);
                    writer
                        .write_sentence(&sentence, dependencies.as_ref())
                        .context("Cannot write sentence")?;
                }
                None => continue,
            }
        }

        writer.flush().context("Cannot flush output")?;

        log_missing_heads(&counter);

        Ok(())
    }

    fn write_conllu<F, R, W>(
        &self,
        extractor: DependencyExtractor<F>,
        read: R,
        mut write: W,
    ) -> Result<()>
    where
        F: HeadFinder,
        R: BufRead,
        W: Write,
    {
        let mut writer = Writer::new(&mut write);
        let mut counter = MissingHeadCounter::default();
        let mut stats = ConversionStats::new();

        for block in ConllReader::new(read, self.layout) {
            let sentence = match read_block(block, &mut stats)? {
                Some(Block::Sentence(sentence)) => sentence,
                Some(Block::Marker(_)) | None => continue,
            };

            let dependencies = match self.extract(&extractor, &sentence, &mut counter, &mut stats) {
                Some(dependencies) => dependencies,
                None => continue,
            };

            let words = sentence.words();
            let tags = sentence.tags();
            let graph = dependencies
                .to_sentence(&words, Some(tags.as_slice()))
                .context("Cannot construct dependency graph")?;

            writer
                .write_sentence(&graph)
                .context("Cannot write sentence")?;
        }

        write.flush().context("Cannot flush output")?;

        log_missing_heads(&counter);

        Ok(())
    }
}

/// Unwrap a block from the column reader.
///
/// Sentences with too few columns are logged, counted, and skipped. Other
/// read errors are fatal.
fn read_block(
    block: Result<Block, ConllError>,
    stats: &mut ConversionStats,
) -> Result<Option<Block>> {
    match block {
        Ok(block) => Ok(Some(block)),
        Err(err @ (ConllError::TooFewColumns { .. } | ConllError::ShortRow { .. })) => {
            warn!("Skipping sentence: {}", err);
            stats.count_malformed();
            Ok(None)
        }
        Err(err) => Err(err).context("Cannot read sentence"),
    }
}

pub(crate) fn log_missing_heads(counter: &MissingHeadCounter) {
    if counter.count() > 0 {
        warn!(
            "No head found for {} constituents, used their first children",
            counter.count()
        );
    }
}

fn parse_column(matches: &ArgMatches, column: &str) -> Result<usize> {
    let value = matches.get_one::<String>(column).unwrap();
    let idx: usize = value
        .parse()
        .context(format!("Cannot parse column index: {}", value))?;

    Ok(idx)
}

impl TreeheadApp for ConvertApp {
    fn app() -> Command {
        Command::new("convert")
            .about("Add dependency heads to a column file with parse fragments")
            .arg(
                Arg::new(WORD_COLUMN)
                    .long("word-column")
                    .value_name("N")
                    .help("Column with the word forms (zero-based)")
                    .default_value("3"),
            )
            .arg(
                Arg::new(TAG_COLUMN)
                    .long("tag-column")
                    .value_name("N")
                    .help("Column with the part-of-speech tags (zero-based)")
                    .default_value("4"),
            )
            .arg(
                Arg::new(PARSE_COLUMN)
                    .long("parse-column")
                    .value_name("N")
                    .help("Column with the parse fragments (zero-based)")
                    .default_value("5"),
            )
            .arg(
                Arg::new(RULES)
                    .long("rules")
                    .value_name("FILE")
                    .num_args(1)
                    .help("Head finder configuration"),
            )
            .arg(
                Arg::new(NO_ESCAPE)
                    .long("no-escape")
                    .action(ArgAction::SetTrue)
                    .help("Do not replace brackets in words and tags"),
            )
            .arg(
                Arg::new(FORMAT)
                    .long("format")
                    .value_name("FORMAT")
                    .help("Output format")
                    .value_parser(PossibleValuesParser::new(["columns", "conllu"]))
                    .default_value("columns"),
            )
            .arg(Arg::new(INPUT).help("Input data").index(1))
            .arg(Arg::new(OUTPUT).help("Output data").index(2))
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        let layout = ColumnLayout::new(
            parse_column(matches, WORD_COLUMN)?,
            parse_column(matches, TAG_COLUMN)?,
            parse_column(matches, PARSE_COLUMN)?,
        );

        let format = match matches.get_one::<String>(FORMAT).unwrap().as_str() {
            "columns" => OutputFormat::Columns,
            "conllu" => OutputFormat::Conllu,
            unknown => bail!("Unknown output format: {}", unknown),
        };

        Ok(ConvertApp {
            escape: !matches.get_flag(NO_ESCAPE),
            format,
            input: matches.get_one::<String>(INPUT).map(ToOwned::to_owned),
            layout,
            output: matches.get_one::<String>(OUTPUT).map(ToOwned::to_owned),
            rules: matches.get_one::<String>(RULES).map(ToOwned::to_owned),
        })
    }

    fn run(&self) -> Result<()> {
        let head_finder = load_head_finder(self.rules.as_deref())?;
        let extractor = DependencyExtractor::new(&head_finder);

        let input = Input::from(self.input.as_ref());
        let read = open_input(&input, self.input.as_ref())?;

        let output = Output::from(self.output.as_ref());
        let write = BufWriter::new(output.write().context("Cannot open output for writing")?);

        match self.format {
            OutputFormat::Columns => self.write_columns(extractor, read, write),
            OutputFormat::Conllu => self.write_conllu(extractor, read, write),
        }
    }
}
