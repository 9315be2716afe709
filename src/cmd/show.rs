use std::fmt;

use serde::Serialize;
use structopt::StructOpt;

use crate::cmd::Outcome;
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct ShowOpt {}

impl ShowOpt {
    pub fn run(&self, conf: &Config, _cnsl: &mut Console) -> Result<ShowOutcome> {
        Ok(ShowOutcome { conf: conf.clone() })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShowOutcome {
    conf: Config,
}

impl fmt::Display for ShowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.conf.path() {
            Some(path) => writeln!(f, "# {}", path)?,
            None => writeln!(f, "# default config")?,
        }
        write!(f, "{}", self.conf)
    }
}

impl Outcome for ShowOutcome {
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::cmd::tests::run_with;

    #[test]
    fn run_default() -> anyhow::Result<()> {
        let opt = ShowOpt {};
        let outcome = run_with(&tempdir()?, |conf, cnsl| opt.run(conf, cnsl))?;
        let shown = outcome.to_string();
        assert!(shown.starts_with("# default config"));
        assert!(shown.contains("retry_limit: 20"));
        Ok(())
    }
}
