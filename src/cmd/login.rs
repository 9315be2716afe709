use std::fmt;

use serde::Serialize;
use structopt::StructOpt;

use cffs_codeforces::{CodeforcesActor, HttpTransport, Transport};

use crate::cmd::Outcome;
use crate::{Config, Console, Result};

static USERNAME_ENV: &str = "CFFS_USERNAME";
static PASSWORD_ENV: &str = "CFFS_PASSWORD";

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct LoginOpt {}

impl LoginOpt {
    pub fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<LoginOutcome> {
        let transport = HttpTransport::from_config(conf)?;
        self.run_inner(&transport, conf, cnsl)
    }

    fn run_inner(
        &self,
        transport: &dyn Transport,
        conf: &Config,
        cnsl: &mut Console,
    ) -> Result<LoginOutcome> {
        let user = cnsl.get_env_or_prompt_and_read(USERNAME_ENV, "handle or email: ", false)?;
        let pass = cnsl.get_env_or_prompt_and_read(PASSWORD_ENV, "password: ", true)?;
        let actor = CodeforcesActor::new(transport, conf);
        let is_already = actor.login(user.clone(), pass, cnsl)?;
        // the prompt may have been answered with an email
        let username = actor.current_user(cnsl)?.unwrap_or(user);
        Ok(LoginOutcome {
            username,
            is_already,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginOutcome {
    username: String,
    is_already: bool,
}

impl fmt::Display for LoginOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_already {
            write!(f, "Already logged in to Codeforces as {}", self.username)
        } else {
            write!(f, "Successfully logged in to Codeforces as {}", self.username)
        }
    }
}

impl Outcome for LoginOutcome {
    fn is_error(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::abs_path::AbsPathBuf;
    use crate::cmd::tests::{FixedTransport, SUBMIT_PAGE};
    use crate::ConsoleConfig;

    #[test]
    fn already_logged_in() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        let conf = Config::default_in_dir(&AbsPathBuf::try_new(test_dir.path())?);
        let cnsl = &mut Console::buf_with_input(
            ConsoleConfig::default(),
            "tourist@example.com\nsecret\n",
        );
        let transport = FixedTransport::new(SUBMIT_PAGE);
        let outcome = LoginOpt {}.run_inner(&transport, &conf, cnsl)?;
        assert!(outcome.is_already);
        assert_eq!(outcome.username, "tourist");
        assert_eq!(
            outcome.to_string(),
            "Already logged in to Codeforces as tourist"
        );
        assert!(transport.posts.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn wrong_password() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        let conf = Config::default_in_dir(&AbsPathBuf::try_new(test_dir.path())?);
        let cnsl = &mut Console::buf_with_input(ConsoleConfig::default(), "tourist\nwrong\n");
        let transport =
            FixedTransport::new(r#"<form><input name="csrf_token" value="enter-token"/></form>"#);
        assert!(LoginOpt {}.run_inner(&transport, &conf, cnsl).is_err());
        assert_eq!(transport.posted("password").as_deref(), Some("wrong"));
        Ok(())
    }
}
