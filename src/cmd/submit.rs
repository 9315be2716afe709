use std::fmt;
use std::io::Write as _;
use std::time::Instant;

use anyhow::Context as _;
use reqwest::Url;
use serde::Serialize;
use structopt::StructOpt;

use cffs_codeforces::{
    channel, AmbientTokens, CodeforcesActor, Dispatch, EditorFactory, Executor, HttpTransport,
    PlainSource, Target, Transport,
};

use crate::abs_path::AbsPathBuf;
use crate::cmd::Outcome;
use crate::web::open_in_browser;
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq)]
#[structopt(rename_all = "kebab")]
pub struct SubmitOpt {
    /// Address of the problem page, e.g. https://codeforces.com/contest/1234/problem/A
    #[structopt(name = "url")]
    page_url: Url,
    /// Language id to submit with. Saved as the default language.
    #[structopt(long, short)]
    lang: Option<String>,
    /// Source file. Read from stdin when omitted and no editor is used.
    #[structopt(long, short, parse(try_from_str = AbsPathBuf::resolve))]
    source: Option<AbsPathBuf>,
    /// Never opens an external editor
    #[structopt(long)]
    plain: bool,
    /// Overrides the ftaa token of the form
    #[structopt(long, env = "CFFS_FTAA", hide_env_values = true)]
    ftaa: Option<String>,
    /// Overrides the bfaa token of the form
    #[structopt(long, env = "CFFS_BFAA", hide_env_values = true)]
    bfaa: Option<String>,
    /// Opens the page Codeforces redirects to after submitting
    #[structopt(long)]
    open: bool,
}

impl SubmitOpt {
    pub fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<SubmitOutcome> {
        let transport = HttpTransport::from_config(conf)?;
        let outcome = self.run_inner(&transport, conf, cnsl)?;
        if self.open {
            if let Some(dispatch) = &outcome.dispatch {
                open_in_browser(&dispatch.url)?;
            }
        }
        Ok(outcome)
    }

    fn build_editors(&self, conf: &Config) -> Result<EditorFactory> {
        let rich_command = if self.plain {
            None
        } else {
            conf.editor().resolve_command()
        };
        let plain_source = match &self.source {
            Some(path) => PlainSource::File(path.clone()),
            None => PlainSource::Stdin,
        };
        let factory = EditorFactory::new(rich_command, plain_source);
        match (&self.source, factory.is_rich()) {
            (Some(path), true) => {
                let text = path
                    .read_to_string()
                    .context("Could not load source file")?;
                Ok(factory.with_initial_text(text))
            }
            _ => Ok(factory),
        }
    }

    fn run_inner(
        &self,
        transport: &dyn Transport,
        conf: &Config,
        cnsl: &mut Console,
    ) -> Result<SubmitOutcome> {
        let store = conf.settings_store();
        let settings = store.load(cnsl)?;
        let editors = self.build_editors(conf)?;

        let (notifier, listener) = channel();
        let actor = CodeforcesActor::new(transport, conf);
        let mut session = actor
            .activate(&self.page_url, &editors, &settings, cnsl)?
            .with_listener(listener);
        if let Some(lang) = &self.lang {
            session.change_language(lang, &store, &notifier, cnsl)?;
        }
        session.focus_editor(cnsl)?;
        // settings changed while editing win over the ones loaded at startup
        session.apply_messages();

        let lang_id = match session.panel() {
            Some(panel) => {
                writeln!(cnsl, "{}", panel)?;
                panel.lang_id().map(ToOwned::to_owned)
            }
            None => None,
        };
        let target = session.target().clone();
        if !cnsl.confirm(&format!("Submit to {}?", target.endpoint()), true)? {
            return Ok(SubmitOutcome {
                target,
                lang_id,
                dispatch: None,
            });
        }

        let ambient = AmbientTokens::new(self.ftaa.clone(), self.bfaa.clone());
        let executor = Executor::new(transport, ambient);
        let dispatch = executor.submit(&mut session, Instant::now(), cnsl)?;
        Ok(SubmitOutcome {
            target,
            lang_id,
            dispatch: Some(dispatch),
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    target: Target,
    lang_id: Option<String>,
    dispatch: Option<Dispatch>,
}

impl fmt::Display for SubmitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.dispatch {
            Some(dispatch) => write!(
                f,
                "Submitted problem {} in language {} : {}",
                self.target.problem_id(),
                self.lang_id.as_deref().unwrap_or("-"),
                dispatch.url
            ),
            None => write!(f, "Cancelled submission to {}", self.target),
        }
    }
}

impl Outcome for SubmitOutcome {
    fn is_error(&self) -> bool {
        false
    }
}
