use std::fmt;

use serde::Serialize;
use structopt::StructOpt;

use crate::cmd::Outcome;
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct LogoutOpt {}

impl LogoutOpt {
    pub fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<LogoutOutcome> {
        let cookies_path = conf.session().cookies_path();
        let removed = cookies_path.remove_file_pretty(cnsl)?;
        Ok(LogoutOutcome::new(removed))
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogoutOutcome {
    removed: bool,
}

impl LogoutOutcome {
    pub fn new(removed: bool) -> Self {
        Self { removed }
    }
}

impl fmt::Display for LogoutOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.removed {
            f.write_str("Successfully logged out from Codeforces")
        } else {
            f.write_str("Not logged in to Codeforces")
        }
    }
}

impl Outcome for LogoutOutcome {
    fn is_error(&self) -> bool {
        false
    }
}
