#![warn(clippy::all)]

#[macro_use]
extern crate strum;

use std::fmt;
use std::io;

use anyhow::{anyhow, Context as _};
use serde::Serialize;
use structopt::StructOpt;
use strum::VariantNames;

mod cmd;

use cffs_config as config;
use cffs_util::{abs_path, console, web};

use crate::abs_path::AbsPathBuf;
use crate::cmd::{Cmd, Outcome as _, OutcomeSerialize as _};
use crate::config::Config;
pub use crate::console::{Console, ConsoleConfig};

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;

#[derive(StructOpt, Debug, Clone, PartialEq, Eq)]
#[structopt(
    about = "Submits solutions to Codeforces problems straight from the problem page address",
    rename_all = "kebab"
)]
pub struct Opt {
    #[structopt(flatten)]
    global_opt: GlobalOpt,
    #[structopt(subcommand)]
    cmd: Cmd,
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq)]
#[structopt(rename_all = "kebab")]
pub struct GlobalOpt {
    /// Path to the config file
    #[structopt(
        long,
        global = true,
        env = "CFFS_CONFIG",
        parse(try_from_str = AbsPathBuf::resolve)
    )]
    config: Option<AbsPathBuf>,
    /// Format of the outcome printed to stdout
    #[structopt(
        long,
        short,
        global = true,
        default_value = OutputFormat::Default.into(),
        possible_values = &OutputFormat::VARIANTS,
    )]
    output: OutputFormat,
    /// Assumes "yes" as answer to all prompts and run non-interactively
    #[structopt(long = "yes", short = "y", global = true)]
    assume_yes: bool,
    /// Hides progress messages
    #[structopt(long, short, global = true)]
    quiet: bool,
}

impl Opt {
    /// Console progress messages are written to.
    pub fn build_console(&self) -> Console {
        let conf = ConsoleConfig {
            assume_yes: self.global_opt.assume_yes,
        };
        if self.global_opt.quiet {
            Console::sink(conf)
        } else {
            Console::term(conf)
        }
    }

    pub fn run(&self, stdout: &mut dyn io::Write, cnsl: &mut Console) -> Result<()> {
        let conf = Config::load(self.global_opt.config.clone(), cnsl)
            .context("Could not load config")?;
        let outcome = self.cmd.run(&conf, cnsl)?;
        outcome.print(stdout, self.global_opt.output)?;
        if outcome.is_error() {
            Err(anyhow!("Command finished with error"))
        } else {
            Ok(())
        }
    }
}

#[derive(
    Serialize, EnumString, EnumVariantNames, IntoStaticStr, Debug, Copy, Clone, PartialEq, Eq, Hash,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OutputFormat {
    Default,
    Debug,
    Json,
    Yaml,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.into())
    }
}
