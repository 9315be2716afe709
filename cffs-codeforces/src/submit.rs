use std::collections::BTreeMap;
use std::fmt;
use std::time::Instant;

use anyhow::{anyhow, Context as _};
use maplit::btreemap;
use serde::Serialize;

use crate::error::SubmitError;
use crate::session::Session;
use crate::target::TargetKind;
use crate::transport::Transport;
use crate::{Console, Result};

/// Where the submission of a panel stands.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitState {
    Idle,
    Submitting,
    Failed,
    Dispatched(Dispatch),
}

impl fmt::Display for SubmitState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitting => write!(f, "submitting"),
            Self::Failed => write!(f, "failed"),
            Self::Dispatched(dispatch) => write!(f, "already submitted ({})", dispatch.url),
        }
    }
}

/// The remote site's answer to a dispatched submission.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dispatch {
    pub status: u16,
    pub url: String,
}

impl fmt::Display for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.status, self.url)
    }
}

/// Anti-automation values supplied from outside the page, e.g. a browser session.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct AmbientTokens {
    pub ftaa: Option<String>,
    pub bfaa: Option<String>,
}

impl AmbientTokens {
    pub fn new(ftaa: Option<String>, bfaa: Option<String>) -> Self {
        Self {
            ftaa: ftaa.filter(|v| !v.is_empty()),
            bfaa: bfaa.filter(|v| !v.is_empty()),
        }
    }
}

/// Replays the remote form's native submission.
pub struct Executor<'a> {
    transport: &'a dyn Transport,
    ambient: AmbientTokens,
}

impl<'a> Executor<'a> {
    pub fn new(transport: &'a dyn Transport, ambient: AmbientTokens) -> Self {
        Self { transport, ambient }
    }

    pub fn submit(
        &self,
        session: &mut Session,
        now: Instant,
        cnsl: &mut Console,
    ) -> std::result::Result<Dispatch, SubmitError> {
        let panel = session
            .panel_mut()
            .ok_or_else(|| SubmitError::submission(anyhow!("No submission panel is mounted")))?;
        if panel.state() != &SubmitState::Idle || !panel.trigger().is_enabled() {
            let err = SubmitError::NotIdle(panel.state().to_string());
            cnsl.warn(&err.to_string()).unwrap_or(());
            return Err(err);
        }

        if let Some(editor) = panel.editor() {
            panel.mirror().sync_from(editor);
        }
        if panel.mirror().is_blank() {
            let err = SubmitError::EmptySource;
            cnsl.warn(&err.to_string()).unwrap_or(());
            return Err(err);
        }

        panel.trigger_mut().disable();
        panel.set_state(SubmitState::Submitting);
        let pb = cnsl.build_spinner("Submitting ...");
        let result = self.dispatch(session, now, cnsl);
        pb.finish_and_clear();

        // the panel stays mounted while dispatching
        let panel = match session.panel_mut() {
            Some(panel) => panel,
            None => return result.map_err(SubmitError::submission),
        };
        match result {
            Ok(dispatch) => {
                panel.set_state(SubmitState::Dispatched(dispatch.clone()));
                cnsl.info(&format!("Submitted : {}", dispatch)).unwrap_or(());
                Ok(dispatch)
            }
            Err(err) => {
                panel.set_state(SubmitState::Failed);
                panel.trigger_mut().restore();
                let err = SubmitError::submission(err);
                cnsl.error(&err.to_string()).unwrap_or(());
                panel.set_state(SubmitState::Idle);
                Err(err)
            }
        }
    }

    fn dispatch(
        &self,
        session: &mut Session,
        now: Instant,
        cnsl: &mut Console,
    ) -> Result<Dispatch> {
        if session.poll_freshness(now) {
            cnsl.info("Regenerating tokens ...")?;
            if let Err(err) = session.regenerate_tokens(self.transport, cnsl) {
                cnsl.warn(&format!("Could not regenerate tokens, using the old ones : {}", err))?;
            }
        }

        let form = self.build_form(session)?;
        let form: Vec<(&str, String)> = form.into_iter().collect();
        let fetched = self
            .transport
            .post_form(session.target().endpoint(), &form, cnsl)
            .context("Could not send submission")?;
        Ok(Dispatch {
            status: fetched.status.as_u16(),
            url: fetched.url.to_string(),
        })
    }

    fn build_form(&self, session: &mut Session) -> Result<BTreeMap<&'static str, String>> {
        let target = session.target().clone();
        let panel = session
            .panel_mut()
            .context("No submission panel is mounted")?;
        if let Some(ftaa) = &self.ambient.ftaa {
            panel.tokens_mut().set_ftaa(ftaa.clone());
        }
        if let Some(bfaa) = &self.ambient.bfaa {
            panel.tokens_mut().set_bfaa(bfaa.clone());
        }

        let tokens = panel.tokens();
        if tokens.csrf_token().is_empty() {
            return Err(anyhow!("Could not find csrf token in the submit form"));
        }
        let lang_id = panel
            .lang_id()
            .context("Could not find any language in the submit form")?;

        let mut form = btreemap! {
            "csrf_token" => tokens.csrf_token().clone(),
            "ftaa" => tokens.ftaa().clone(),
            "bfaa" => tokens.bfaa().clone(),
            "action" => tokens.action().clone(),
            "submittedProblemIndex" => target.problem_id().clone(),
            "programTypeId" => lang_id.to_owned(),
            "source" => panel.mirror().text(),
        };
        if target.kind() == &TargetKind::Problemset {
            form.insert("submittedProblemCode", target.problem_code());
            form.insert("contestId", target.contest_id().clone());
        }
        Ok(form)
    }
}
