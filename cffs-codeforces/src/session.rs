use std::time::{Duration, Instant};

use anyhow::anyhow;

use crate::acquire::{acquire, Acquisition};
use crate::config::{Settings, SettingsStore};
use crate::editor::{Editor as _, EditorAdapter, EditorFactory};
use crate::freshness::FreshnessTimer;
use crate::message::{Delivery, Listener, Message, Notifier};
use crate::mirror::SourceMirror;
use crate::model::{LangId, LangIdRef};
use crate::panel::{PanelHost, SubmitPanel};
use crate::target::Target;
use crate::transport::Transport;
use crate::{Console, Result};

/// Everything one activation on a problem page owns.
#[derive(Debug)]
pub struct Session {
    target: Target,
    host: PanelHost,
    freshness: FreshnessTimer,
    preferred_lang: LangId,
    listener: Option<Listener>,
}

impl Session {
    pub fn new(target: Target, settings: &Settings, regenerate_interval: Duration) -> Self {
        Self {
            target,
            host: PanelHost::new(),
            freshness: FreshnessTimer::new(regenerate_interval),
            preferred_lang: settings.default_language().clone(),
            listener: None,
        }
    }

    pub fn with_listener(mut self, listener: Listener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn host(&self) -> &PanelHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut PanelHost {
        &mut self.host
    }

    pub fn panel(&self) -> Option<&SubmitPanel> {
        self.host.panel()
    }

    pub fn panel_mut(&mut self) -> Option<&mut SubmitPanel> {
        self.host.panel_mut()
    }

    pub fn freshness(&self) -> &FreshnessTimer {
        &self.freshness
    }

    pub fn preferred_lang(&self) -> LangIdRef {
        &self.preferred_lang
    }

    /// One acquisition attempt. Returns false when the form is not ready yet.
    pub fn init_panel(
        &mut self,
        transport: &dyn Transport,
        editors: &EditorFactory,
        cnsl: &mut Console,
    ) -> Result<bool> {
        let form = match acquire(&mut self.target, transport, cnsl)? {
            Acquisition::Found(form) => form,
            Acquisition::FormNotFound => return Ok(false),
        };
        let mirror = self
            .host
            .panel()
            .map(|panel| panel.mirror().clone())
            .unwrap_or_else(SourceMirror::new);
        let preferred = Some(self.preferred_lang.as_str());
        let panel = SubmitPanel::new(form, &self.target, preferred, mirror);
        let editor = editors.bind(panel.mirror(), panel.lang_id())?;
        self.host.mount(panel).bind_editor(editor);
        self.freshness.arm(Instant::now());
        Ok(true)
    }

    /// Fetches a fresh token bundle for the mounted panel.
    pub fn regenerate_tokens(
        &mut self,
        transport: &dyn Transport,
        cnsl: &mut Console,
    ) -> Result<()> {
        if self.host.panel().is_none() {
            return Err(anyhow!("No submission panel is mounted"));
        }
        match acquire(&mut self.target, transport, cnsl)? {
            Acquisition::Found(form) => {
                let (tokens, _, _) = form.into_parts();
                if let Some(panel) = self.host.panel_mut() {
                    panel.replace_tokens(tokens);
                }
                self.freshness.arm(Instant::now());
                Ok(())
            }
            Acquisition::FormNotFound => Err(anyhow!("Submit form was not found")),
        }
    }

    pub fn poll_freshness(&mut self, now: Instant) -> bool {
        self.freshness.poll(now)
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorAdapter> {
        self.host.panel_mut().and_then(SubmitPanel::editor_mut)
    }

    pub fn focus_editor(&mut self, cnsl: &mut Console) -> Result<()> {
        let editor = self
            .editor_mut()
            .ok_or_else(|| anyhow!("No editor is bound"))?;
        editor.focus(cnsl)
    }

    /// Switches the language, persists it and tells other contexts.
    pub fn change_language(
        &mut self,
        lang_id: LangIdRef,
        store: &SettingsStore,
        notifier: &Notifier,
        cnsl: &mut Console,
    ) -> Result<Delivery> {
        if let Some(panel) = self.host.panel_mut() {
            if !panel.select_language(lang_id) {
                return Err(anyhow!("Language {} is not offered by the form", lang_id));
            }
        }
        self.preferred_lang = lang_id.to_owned();
        let settings = store.save_language(lang_id, cnsl)?;
        Ok(notifier.notify(Message::SettingsUpdated { settings }))
    }

    /// Applies settings changed by other contexts. Returns the number of messages handled.
    pub fn apply_messages(&mut self) -> usize {
        let messages = match &self.listener {
            Some(listener) => listener.drain(),
            None => return 0,
        };
        for message in &messages {
            match message {
                Message::SettingsUpdated { settings } => {
                    let lang_id = settings.default_language();
                    self.preferred_lang = lang_id.clone();
                    if let Some(panel) = self.host.panel_mut() {
                        panel.select_language(lang_id);
                    }
                }
            }
        }
        messages.len()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Url;
    use tempfile::tempdir;

    use super::*;
    use crate::abs_path::AbsPathBuf;
    use crate::console::ConsoleConfig;
    use crate::editor::PlainSource;
    use crate::message::channel;
    use crate::testing::{ScriptedTransport, LOADING_PAGE, SUBMIT_PAGE};

    fn session(settings: &Settings) -> Session {
        let url = Url::parse("https://codeforces.com/contest/1234/problem/A").unwrap();
        Session::new(
            Target::classify(&url).unwrap(),
            settings,
            Duration::from_secs(60),
        )
    }

    fn editors() -> EditorFactory {
        EditorFactory::new(None, PlainSource::Stdin)
    }

    #[test]
    fn init_panel_mounts_once() -> anyhow::Result<()> {
        let transport = ScriptedTransport::new(vec![
            Ok(LOADING_PAGE.to_owned()),
            Ok(SUBMIT_PAGE.to_owned()),
            Ok(SUBMIT_PAGE.to_owned()),
        ]);
        let cnsl = &mut Console::sink(ConsoleConfig::default());
        let mut session = session(&Settings::new("31"));

        assert!(!session.init_panel(&transport, &editors(), cnsl)?);
        assert_eq!(session.host().mounted_count(), 0);
        assert!(!session.freshness().is_armed());

        assert!(session.init_panel(&transport, &editors(), cnsl)?);
        assert!(session.init_panel(&transport, &editors(), cnsl)?);
        assert_eq!(session.host().mounted_count(), 1);
        assert!(session.freshness().is_armed());
        assert_eq!(session.target().participant_id(), &Some("98765".to_owned()));

        let panel = session.panel().unwrap();
        assert_eq!(panel.lang_id(), Some("31"));
        assert!(panel.editor().is_some());
        Ok(())
    }

    #[test]
    fn change_language_persists_and_notifies() -> anyhow::Result<()> {
        let test_dir = tempdir()?;
        let store =
            SettingsStore::new(AbsPathBuf::try_new(test_dir.path())?.join("settings.yaml"));
        let transport = ScriptedTransport::serving(SUBMIT_PAGE);
        let cnsl = &mut Console::sink(ConsoleConfig::default());
        let mut session = session(&Settings::default());
        session.init_panel(&transport, &editors(), cnsl)?;

        let (notifier, listener) = channel();
        let delivery = session.change_language("75", &store, &notifier, cnsl)?;
        assert_eq!(delivery, Delivery::Delivered);
        assert_eq!(session.panel().unwrap().lang_id(), Some("75"));
        assert_eq!(store.load(cnsl)?.default_language(), "75");
        assert_eq!(listener.drain().len(), 1);

        assert!(session
            .change_language("1000", &store, &Notifier::detached(), cnsl)
            .is_err());
        assert_eq!(store.load(cnsl)?.default_language(), "75");
        Ok(())
    }

    #[test]
    fn messages_from_other_contexts() -> anyhow::Result<()> {
        let transport = ScriptedTransport::serving(SUBMIT_PAGE);
        let cnsl = &mut Console::sink(ConsoleConfig::default());
        let (notifier, listener) = channel();
        let mut session = session(&Settings::default()).with_listener(listener);
        session.init_panel(&transport, &editors(), cnsl)?;
        assert_eq!(session.apply_messages(), 0);

        notifier.notify(Message::SettingsUpdated {
            settings: Settings::new("43"),
        });
        assert_eq!(session.apply_messages(), 1);
        assert_eq!(session.preferred_lang(), "43");
        assert_eq!(session.panel().unwrap().lang_id(), Some("43"));
        Ok(())
    }

    #[test]
    fn regenerate_tokens_replaces_bundle() -> anyhow::Result<()> {
        let fresh = SUBMIT_PAGE.replace("csrf-abc", "csrf-new");
        let transport = ScriptedTransport::new(vec![
            Ok(SUBMIT_PAGE.to_owned()),
            Ok(fresh),
            Ok(LOADING_PAGE.to_owned()),
        ]);
        let cnsl = &mut Console::sink(ConsoleConfig::default());
        let mut session = session(&Settings::default());
        session.init_panel(&transport, &editors(), cnsl)?;

        session.regenerate_tokens(&transport, cnsl)?;
        assert_eq!(session.panel().unwrap().tokens().csrf_token(), "csrf-new");
        assert!(session.regenerate_tokens(&transport, cnsl).is_err());
        assert_eq!(session.panel().unwrap().tokens().csrf_token(), "csrf-new");
        Ok(())
    }
}
