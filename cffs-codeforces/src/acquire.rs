use std::io::Write as _;
use std::time::Duration;

use anyhow::anyhow;
use retry::{delay, retry, OperationResult};

use crate::config::SessionConfig;
use crate::editor::EditorFactory;
use crate::error::SubmitError;
use crate::page::{SubmitForm, SubmitPageBuilder};
use crate::session::Session;
use crate::target::Target;
use crate::transport::Transport;
use crate::{Console, Error, Result};

/// Result of one look at the submit endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    Found(SubmitForm),
    /// The page is not ready yet, e.g. an interstitial is shown.
    FormNotFound,
}

/// Fetches the submit endpoint once and extracts the form.
///
/// Contest and participant ids found in the markup overwrite the ones in `target`.
pub fn acquire(
    target: &mut Target,
    transport: &dyn Transport,
    cnsl: &mut Console,
) -> Result<Acquisition> {
    let page = SubmitPageBuilder::new(target.endpoint()).build(transport, cnsl)?;
    let form = match page.extract_form() {
        Some(form) => form,
        None => return Ok(Acquisition::FormNotFound),
    };
    if let Some(contest_id) = page.extract_contest_id() {
        target.set_contest_id(contest_id);
    }
    if let Some(participant_id) = page.extract_participant_id() {
        target.set_participant_id(participant_id);
    }
    Ok(Acquisition::Found(form))
}

/// Retries acquisition until a panel is mounted or the attempts run out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Supervisor {
    retry_limit: usize,
    retry_interval: Duration,
}

impl Supervisor {
    pub fn new(retry_limit: usize, retry_interval: Duration) -> Self {
        Self {
            retry_limit,
            retry_interval,
        }
    }

    pub fn from_config(session: &SessionConfig) -> Self {
        Self::new(session.retry_limit(), session.retry_interval())
    }

    /// Returns the number of attempts it took to mount the panel.
    pub fn run(
        &self,
        session: &mut Session,
        transport: &dyn Transport,
        editors: &EditorFactory,
        cnsl: &mut Console,
    ) -> std::result::Result<usize, SubmitError> {
        let retry_limit = self.retry_limit.max(1);
        let retry_interval = self.retry_interval.as_millis() as u64;
        // first attempt is not delayed
        let durations = delay::Fixed::from_millis(retry_interval).take(retry_limit - 1);
        let mut attempts = 0;
        let result = retry(durations, || {
            attempts += 1;
            let err = match session.init_panel(transport, editors, cnsl) {
                Ok(true) => return OperationResult::Ok(()),
                Ok(false) => anyhow!("Submit form was not found"),
                Err(err) => err,
            };
            session.host_mut().remove();
            writeln!(
                cnsl,
                "Attempt {}/{} failed : {}",
                attempts, retry_limit, err
            )
            .unwrap_or(());
            OperationResult::Retry(err)
        });

        match result {
            Ok(()) => Ok(attempts),
            Err(err) => {
                let err = match err {
                    retry::Error::Operation { error, .. } => error,
                    retry::Error::Internal(msg) => Error::msg(msg),
                };
                let err = SubmitError::acquisition(attempts, err);
                cnsl.error(&err.to_string()).unwrap_or(());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cffs_util::assert_matches;
    use ntest::timeout;
    use reqwest::Url;

    use super::*;
    use crate::config::Settings;
    use crate::console::ConsoleConfig;
    use crate::editor::PlainSource;
    use crate::testing::{ScriptedTransport, LOADING_PAGE, SUBMIT_PAGE};

    fn session(url: &str) -> Session {
        let target = Target::classify(&Url::parse(url).unwrap()).unwrap();
        Session::new(target, &Settings::default(), Duration::from_secs(60))
    }

    fn editors() -> EditorFactory {
        EditorFactory::new(None, PlainSource::Stdin)
    }

    #[test]
    fn acquire_overwrites_ids() -> anyhow::Result<()> {
        let mut target =
            Target::classify(&Url::parse("https://codeforces.com/problemset/problem/1/A")?)?;
        let transport = ScriptedTransport::serving(SUBMIT_PAGE);
        let cnsl = &mut Console::sink(ConsoleConfig::default());
        assert_matches!(acquire(&mut target, &transport, cnsl)? => Acquisition::Found(_));
        assert_eq!(target.contest_id(), "1234");
        assert_eq!(target.participant_id(), &Some("98765".to_owned()));
        Ok(())
    }

    #[test]
    fn acquire_twice_yields_same_form() -> anyhow::Result<()> {
        let mut target =
            Target::classify(&Url::parse("https://codeforces.com/contest/1234/problem/A")?)?;
        let transport = ScriptedTransport::serving(SUBMIT_PAGE);
        let cnsl = &mut Console::sink(ConsoleConfig::default());

        let first = acquire(&mut target, &transport, cnsl)?;
        let ids = (target.contest_id().clone(), target.participant_id().clone());
        let second = acquire(&mut target, &transport, cnsl)?;

        assert_matches!(&first => Acquisition::Found(_));
        assert_eq!(first, second);
        assert_eq!(
            (target.contest_id().clone(), target.participant_id().clone()),
            ids
        );
        assert_eq!(ids, ("1234".to_owned(), Some("98765".to_owned())));
        assert_eq!(transport.get_count(), 2);
        Ok(())
    }

    #[test]
    fn acquire_without_form_keeps_ids() -> anyhow::Result<()> {
        let mut target =
            Target::classify(&Url::parse("https://codeforces.com/contest/7/problem/A")?)?;
        let transport = ScriptedTransport::serving(
            "<html><script>var contestId = 99;</script><p>wait</p></html>",
        );
        let cnsl = &mut Console::sink(ConsoleConfig::default());
        assert_eq!(
            acquire(&mut target, &transport, cnsl)?,
            Acquisition::FormNotFound
        );
        assert_eq!(target.contest_id(), "7");
        Ok(())
    }

    #[test]
    #[timeout(5000)]
    fn succeeds_on_fourth_attempt() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new(vec![
            Ok(LOADING_PAGE.to_owned()),
            Ok(LOADING_PAGE.to_owned()),
            Ok(LOADING_PAGE.to_owned()),
            Ok(SUBMIT_PAGE.to_owned()),
        ]);
        let mut session = session("https://codeforces.com/contest/1234/problem/A");
        let cnsl = &mut Console::buf(ConsoleConfig::default());
        let attempts = Supervisor::new(20, Duration::from_millis(0)).run(
            &mut session,
            &transport,
            &editors(),
            cnsl,
        )?;

        assert_eq!(attempts, 4);
        assert_eq!(transport.get_count(), 4);
        assert_eq!(session.host().mounted_count(), 1);
        assert!(session.freshness().is_armed());
        Ok(())
    }

    #[test]
    #[timeout(5000)]
    fn gives_up_after_limit() -> anyhow::Result<()> {
        let transport = ScriptedTransport::serving(LOADING_PAGE);
        let mut session = session("https://codeforces.com/gym/100001/problem/A");
        let cnsl = &mut Console::buf(ConsoleConfig::default());
        let result = Supervisor::new(5, Duration::from_millis(0)).run(
            &mut session,
            &transport,
            &editors(),
            cnsl,
        );

        assert_matches!(result => Err(SubmitError::Acquisition { attempts: 5, .. }));
        assert_eq!(transport.get_count(), 5);
        assert_eq!(session.host().mounted_count(), 0);
        let output = std::mem::replace(cnsl, Console::sink(ConsoleConfig::default()))
            .take_output()?;
        assert!(output.contains("Failed to initialize after 5 attempts"));
        Ok(())
    }

    #[test]
    #[timeout(5000)]
    fn transport_errors_count_as_attempts() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new(vec![
            Err(anyhow!("connection reset")),
            Err(anyhow!("timed out")),
            Ok(SUBMIT_PAGE.to_owned()),
        ]);
        let mut session = session("https://codeforces.com/contest/1234/problem/A");
        let cnsl = &mut Console::sink(ConsoleConfig::default());
        let attempts = Supervisor::new(3, Duration::from_millis(0)).run(
            &mut session,
            &transport,
            &editors(),
            cnsl,
        )?;
        assert_eq!(attempts, 3);
        assert_eq!(session.host().mounted_count(), 1);
        Ok(())
    }

    #[test]
    #[timeout(5000)]
    fn waits_between_attempts() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new(vec![
            Ok(LOADING_PAGE.to_owned()),
            Ok(SUBMIT_PAGE.to_owned()),
        ]);
        let mut session = session("https://codeforces.com/contest/1234/problem/A");
        let cnsl = &mut Console::sink(ConsoleConfig::default());
        let started = std::time::Instant::now();
        Supervisor::new(20, Duration::from_millis(50)).run(
            &mut session,
            &transport,
            &editors(),
            cnsl,
        )?;
        assert!(started.elapsed() >= Duration::from_millis(50));
        Ok(())
    }
}
