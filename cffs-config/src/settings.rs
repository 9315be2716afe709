use std::io::Write as _;

use anyhow::Context as _;
use getset::Getters;
use serde::{Deserialize, Serialize};

use crate::abs_path::AbsPathBuf;
use crate::model::{LangId, LangIdRef};
use crate::{Console, Result};

/// User preferences shared by every session.
#[derive(Serialize, Deserialize, Getters, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[get = "pub"]
    default_language: LangId,
}

impl Settings {
    const DEFAULT_LANGUAGE: &'static str = "54";

    pub fn new(default_language: impl Into<LangId>) -> Self {
        Self {
            default_language: default_language.into(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LANGUAGE)
    }
}

/// Key-value preference store backed by a yaml file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsStore {
    path: AbsPathBuf,
}

impl SettingsStore {
    pub fn new(path: AbsPathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &AbsPathBuf {
        &self.path
    }

    /// Loads settings, falling back to defaults when nothing has been saved yet.
    pub fn load(&self, cnsl: &mut Console) -> Result<Settings> {
        if !self.path.as_ref().is_file() {
            return Ok(Settings::default());
        }
        self.path.load_pretty(
            |file| serde_yaml::from_reader(file).context("Could not read settings as yaml"),
            cnsl,
        )
    }

    pub fn save(&self, settings: &Settings, cnsl: &mut Console) -> Result<()> {
        self.path.save_pretty(
            |file| serde_yaml::to_writer(file, settings).context("Could not save settings as yaml"),
            true,
            cnsl,
        )?;
        Ok(())
    }

    /// Persists a new preferred language and returns the updated settings.
    pub fn save_language(&self, lang_id: LangIdRef, cnsl: &mut Console) -> Result<Settings> {
        let mut settings = self.load(cnsl)?;
        if settings.default_language != lang_id {
            settings.default_language = lang_id.to_owned();
            self.save(&settings, cnsl)?;
        }
        Ok(settings)
    }

    pub fn reset(&self, cnsl: &mut Console) -> Result<Settings> {
        let settings = Settings::default();
        self.save(&settings, cnsl)?;
        writeln!(cnsl, "Settings reset to defaults")?;
        Ok(settings)
    }
}
