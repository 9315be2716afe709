use std::fmt;

use reqwest::Url;
use serde::Serialize;
use structopt::StructOpt;

use cffs_codeforces::{PageStatus, Target};

use crate::cmd::Outcome;
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq)]
#[structopt(rename_all = "kebab")]
pub struct StatusOpt {
    /// Address of any page
    #[structopt(name = "url")]
    page_url: Url,
}

impl StatusOpt {
    pub fn run(&self, _conf: &Config, _cnsl: &mut Console) -> Result<StatusOutcome> {
        Ok(StatusOutcome {
            status: PageStatus::of(&self.page_url),
            target: Target::classify(&self.page_url).ok(),
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusOutcome {
    status: PageStatus,
    target: Option<Target>,
}

impl fmt::Display for StatusOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(target) = &self.target {
            write!(f, " : {}", target)?;
        }
        Ok(())
    }
}

impl Outcome for StatusOutcome {
    fn is_error(&self) -> bool {
        false
    }
}
