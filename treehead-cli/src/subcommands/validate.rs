use std::io::BufRead;

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::{error, info};
use stdinout::Input;
use treehead::tree::ParseTree;

use crate::io::open_input;
use crate::traits::TreeheadApp;

const INPUT: &str = "INPUT";

pub struct ValidateApp {
    input: Option<String>,
}

impl ValidateApp {
    fn validate<R>(&self, read: R) -> Result<()>
    where
        R: BufRead,
    {
        let mut n_trees = 0;
        let mut n_malformed = 0;

        for (idx, line) in read.lines().enumerate() {
            let line = line.context("Cannot read line")?;
            if line.trim().is_empty() {
                continue;
            }

            n_trees += 1;
            if let Err(err) = line.parse::<ParseTree>() {
                error!("Line {}: {}", idx + 1, err);
                n_malformed += 1;
            }
        }

        if n_malformed > 0 {
            bail!("{} of {} trees are malformed", n_malformed, n_trees);
        }

        info!("All {} trees are well-formed", n_trees);

        Ok(())
    }
}

impl TreeheadApp for ValidateApp {
    fn app() -> Command {
        Command::new("validate")
            .about("Check that bracketed trees (one per line) are well-formed")
            .arg(Arg::new(INPUT).help("Input trees").index(1))
    }

    fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(ValidateApp {
            input: matches.get_one::<String>(INPUT).map(ToOwned::to_owned),
        })
    }

    fn run(&self) -> Result<()> {
        let input = Input::from(self.input.as_ref());
        let read = open_input(&input, self.input.as_ref())?;
        self.validate(read)
    }
}
