use std::{fmt, io};

use anyhow::Context as _;
use serde::Serialize;
use structopt::StructOpt;

use crate::{Config, Console, OutputFormat, Result};

mod login;
mod logout;
mod settings;
mod show;
mod status;
mod submit;

pub use login::{LoginOpt, LoginOutcome};
pub use logout::{LogoutOpt, LogoutOutcome};
pub use settings::{SettingsCmd, SettingsOpt, SettingsOutcome};
pub use show::{ShowOpt, ShowOutcome};
pub use status::{StatusOpt, StatusOutcome};
pub use submit::{SubmitOpt, SubmitOutcome};

pub trait Outcome: OutcomeSerialize {
    fn is_error(&self) -> bool;
}

pub trait OutcomeSerialize: fmt::Display + fmt::Debug {
    fn write_json(&self, writer: &mut dyn io::Write) -> Result<()>;

    fn write_yaml(&self, writer: &mut dyn io::Write) -> Result<()>;

    fn print(&self, stdout: &mut dyn io::Write, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Default => writeln!(stdout, "{}", self)?,
            OutputFormat::Debug => writeln!(stdout, "{:?}", self)?,
            OutputFormat::Json => {
                self.write_json(stdout)?;
                writeln!(stdout)?;
            }
            OutputFormat::Yaml => self.write_yaml(stdout)?,
        }
        Ok(())
    }
}

impl<T: Serialize + fmt::Display + fmt::Debug> OutcomeSerialize for T {
    fn write_json(&self, writer: &mut dyn io::Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("Could not print outcome as json")
    }

    fn write_yaml(&self, writer: &mut dyn io::Write) -> Result<()> {
        serde_yaml::to_writer(writer, self).context("Could not print outcome as yaml")
    }
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq)]
#[structopt(rename_all = "kebab")]
pub enum Cmd {
    /// Submits a solution to the problem shown at a problem page address
    Submit(SubmitOpt),
    /// Tells whether an address can host the submission panel
    Status(StatusOpt),
    /// Logs in to Codeforces
    Login(LoginOpt),
    /// Logs out from Codeforces
    Logout(LogoutOpt),
    /// Shows or changes persisted settings
    Settings(SettingsOpt),
    /// Shows current config
    Show(ShowOpt),
}

impl Cmd {
    pub fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<Box<dyn Outcome>> {
        match self {
            Self::Submit(opt) => Ok(Box::new(opt.run(conf, cnsl)?)),
            Self::Status(opt) => Ok(Box::new(opt.run(conf, cnsl)?)),
            Self::Login(opt) => Ok(Box::new(opt.run(conf, cnsl)?)),
            Self::Logout(opt) => Ok(Box::new(opt.run(conf, cnsl)?)),
            Self::Settings(opt) => Ok(Box::new(opt.run(conf, cnsl)?)),
            Self::Show(opt) => Ok(Box::new(opt.run(conf, cnsl)?)),
        }
    }
}
