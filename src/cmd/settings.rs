use std::fmt;

use serde::Serialize;
use structopt::StructOpt;

use cffs_codeforces::{Delivery, Message, Notifier};

use crate::abs_path::AbsPathBuf;
use crate::cmd::Outcome;
use crate::config::{Settings, SettingsStore};
use crate::{Config, Console, Result};

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub struct SettingsOpt {
    #[structopt(subcommand)]
    cmd: Option<SettingsCmd>,
}

#[derive(StructOpt, Debug, Clone, PartialEq, Eq, Hash)]
#[structopt(rename_all = "kebab")]
pub enum SettingsCmd {
    /// Shows persisted settings
    Show,
    /// Sets the language selected by default, e.g. `54` for GNU G++17
    SetLanguage {
        #[structopt(name = "lang")]
        lang_id: String,
    },
    /// Restores default settings
    Reset,
}

impl SettingsOpt {
    pub fn run(&self, conf: &Config, cnsl: &mut Console) -> Result<SettingsOutcome> {
        let store = conf.settings_store();
        self.run_inner(&store, &Notifier::detached(), cnsl)
    }

    fn run_inner(
        &self,
        store: &SettingsStore,
        notifier: &Notifier,
        cnsl: &mut Console,
    ) -> Result<SettingsOutcome> {
        let (settings, delivery) = match self.cmd.as_ref().unwrap_or(&SettingsCmd::Show) {
            SettingsCmd::Show => (store.load(cnsl)?, None),
            SettingsCmd::SetLanguage { lang_id } => {
                let settings = store.save_language(lang_id, cnsl)?;
                let delivery = notifier.notify(Message::SettingsUpdated {
                    settings: settings.clone(),
                });
                (settings, Some(delivery))
            }
            SettingsCmd::Reset => {
                let settings = store.reset(cnsl)?;
                let delivery = notifier.notify(Message::SettingsUpdated {
                    settings: settings.clone(),
                });
                (settings, Some(delivery))
            }
        };
        Ok(SettingsOutcome {
            path: store.path().clone(),
            settings,
            delivery,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SettingsOutcome {
    path: AbsPathBuf,
    settings: Settings,
    delivery: Option<Delivery>,
}

impl fmt::Display for SettingsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "# {}", self.path)?;
        write!(f, "defaultLanguage: {}", self.settings.default_language())
    }
}

impl Outcome for SettingsOutcome {
    fn is_error(&self) -> bool {
        false
    }
}
