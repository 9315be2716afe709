use std::io::Write as _;

use anyhow::anyhow;
use maplit::hashmap;
use reqwest::Url;
use scraper::Html;

use crate::acquire::Supervisor;
use crate::config::{Config, Settings};
use crate::editor::EditorFactory;
use crate::page::{EnterPageBuilder, HasHeader as _, ProblemPageBuilder};
use crate::service::scrape::ExtractCsrfToken as _;
use crate::session::Session;
use crate::target::Target;
use crate::transport::Transport;
use crate::{Console, Result};

/// Talks to Codeforces on behalf of one command.
pub struct CodeforcesActor<'a> {
    transport: &'a dyn Transport,
    conf: &'a Config,
}

impl<'a> CodeforcesActor<'a> {
    pub fn new(transport: &'a dyn Transport, conf: &'a Config) -> Self {
        Self { transport, conf }
    }

    /// Logs in unless already logged in. Returns true when the user was already logged in.
    pub fn login(&self, user: String, pass: String, cnsl: &mut Console) -> Result<bool> {
        let enter_page = EnterPageBuilder::new(self.conf.base_url()).build(self.transport, cnsl)?;
        if enter_page.is_logged_in() {
            return Ok(true);
        }

        let payload = hashmap!(
            "csrf_token" => enter_page.extract_csrf_token()?,
            "action" => "enter".to_owned(),
            "handleOrEmail" => user,
            "password" => pass,
            "remember" => "on".to_owned(),
        );
        let form: Vec<(&str, String)> = payload.into_iter().collect();
        let fetched = self
            .transport
            .post_form(enter_page.url(), &form, cnsl)?;

        if !Html::parse_document(&fetched.body).is_logged_in() {
            return Err(anyhow!("Invalid handle/email or password"));
        }
        Ok(false)
    }

    /// Handle of the logged in user, if any.
    pub fn current_user(&self, cnsl: &mut Console) -> Result<Option<String>> {
        let fetched = self.transport.get(self.conf.base_url(), cnsl)?;
        Ok(Html::parse_document(&fetched.body).current_user())
    }

    /// Prepares a submission session for a problem page.
    ///
    /// Fails without any request when the address is not a problem page.
    pub fn activate(
        &self,
        page_url: &Url,
        editors: &EditorFactory,
        settings: &Settings,
        cnsl: &mut Console,
    ) -> Result<Session> {
        let target = Target::classify(page_url)?;
        writeln!(cnsl, "Target : {}", target)?;

        // a transient failure here is left to the supervised acquisition below
        match ProblemPageBuilder::new(page_url).build(self.transport, cnsl) {
            Ok(problem_page) => {
                if !problem_page.is_logged_in() {
                    return Err(anyhow!(
                        "You are not logged in to Codeforces. Run `cffs login` first."
                    ));
                }
                if !problem_page.has_statement() {
                    cnsl.warn("Could not find the problem statement on the page")?;
                }
            }
            Err(err) => cnsl.warn(&format!("Could not check the problem page : {:#}", err))?,
        }

        let session_conf = self.conf.session();
        let mut session = Session::new(target, settings, session_conf.regenerate_interval());
        Supervisor::from_config(session_conf).run(&mut session, self.transport, editors, cnsl)?;
        Ok(session)
    }
}
