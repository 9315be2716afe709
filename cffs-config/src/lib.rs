//! Config for cffs.
//!
//! The config file `cffs.yaml` is searched in the user config directory
//! (e.g. `~/.config/cffs/cffs.yaml`). Every field is optional.
//!
//! ```yaml
//! version: 0.1.0
//! base_url: https://codeforces.com
//! session:
//!   timeout: 30s
//!   retry_limit: 20
//!   retry_interval: 1s
//!   regenerate_interval: 30m
//! editor:
//!   command: code --wait
//! ```
//!
//! Persisted user preferences (the default language) live in a separate
//! settings file, see [`SettingsStore`].

use std::env;
use std::fmt;

use anyhow::{anyhow, Context as _};
use getset::Getters;
use lazy_static::lazy_static;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::Url;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use cffs_util::{abs_path, console, model, Console, CONFIG_DIR, DATA_LOCAL_DIR};

mod session_config;
mod settings;

use crate::abs_path::AbsPathBuf;
pub use session_config::SessionConfig;
pub use settings::{Settings, SettingsStore};

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;

lazy_static! {
    static ref VERSION: Version = Version::parse(env!("CARGO_PKG_VERSION")).unwrap();
}

static USER_AGENT: &str = concat!("cffs/", env!("CARGO_PKG_VERSION"));

#[derive(Serialize, Getters, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[get = "pub"]
    path: Option<AbsPathBuf>,
    body: ConfigBody,
}

impl Config {
    /// Loads the config file at `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location is not an error.
    pub fn load(path: Option<AbsPathBuf>, cnsl: &mut Console) -> Result<Self> {
        let (path, is_explicit) = match path {
            Some(path) => (path, true),
            None => (ConfigBody::default_path(), false),
        };
        if !is_explicit && !path.as_ref().is_file() {
            return Ok(Self {
                path: None,
                body: ConfigBody::default(),
            });
        }
        let body = ConfigBody::load(&path, cnsl)?;
        Ok(Self {
            path: Some(path),
            body,
        })
    }

    /// Config keeping every file it writes under `dir`.
    pub fn default_in_dir(dir: &AbsPathBuf) -> Self {
        Self {
            path: None,
            body: ConfigBody::default_in_dir(dir),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.body.base_url
    }

    pub fn session(&self) -> &SessionConfig {
        &self.body.session
    }

    pub fn session_mut(&mut self) -> &mut SessionConfig {
        &mut self.body.session
    }

    pub fn editor(&self) -> &EditorConfig {
        &self.body.editor
    }

    pub fn settings_store(&self) -> SettingsStore {
        SettingsStore::new(self.body.settings_path.clone())
    }

    pub fn build_client(&self) -> Result<Client> {
        Client::builder()
            .referer(false)
            .redirect(Policy::none()) // redirects manually
            .user_agent(USER_AGENT)
            .timeout(Some(self.session().timeout()))
            .build()
            .context(
                "Could not setup client. \
                 TLS backend cannot be initialized, or the resolver cannot load the system configuration.",
            )
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let yaml_str = serde_yaml::to_string(&self.body).map_err(|_| fmt::Error)?;
        write!(f, "{}", yaml_str)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigBody {
    #[serde(with = "string_serde")]
    version: Version,
    #[serde(with = "string_serde")]
    base_url: Url,
    session: SessionConfig,
    editor: EditorConfig,
    settings_path: AbsPathBuf,
}

impl ConfigBody {
    pub const FILE_NAME: &'static str = "cffs.yaml";

    const DEFAULT_BASE_URL: &'static str = "https://codeforces.com";

    const SETTINGS_FILE_NAME: &'static str = "settings.yaml";

    fn default_path() -> AbsPathBuf {
        CONFIG_DIR.join(Self::FILE_NAME)
    }

    fn default_base_url() -> Url {
        // parsing static url will never fail
        Url::parse(Self::DEFAULT_BASE_URL).unwrap()
    }

    fn default_in_dir(dir: &AbsPathBuf) -> Self {
        Self {
            session: SessionConfig::in_dir(dir),
            settings_path: dir.join(Self::SETTINGS_FILE_NAME),
            ..Self::default()
        }
    }

    fn load(path: &AbsPathBuf, cnsl: &mut Console) -> Result<Self> {
        let body: Self = path.load_pretty(
            |file| serde_yaml::from_reader(file).context("Could not read config file as yaml"),
            cnsl,
        )?;
        body.validate()?;
        Ok(body)
    }

    fn validate(&self) -> Result<()> {
        let version_req =
            VersionReq::parse(&self.version.to_string()).context("Could not parse version")?;
        if !version_req.matches(&VERSION) {
            return Err(anyhow!(
                r#"Found mismatched version in config file.
    config version: {}
    cffs version  : {}
Fix the config file so that it is compatible with the current version of cffs."#,
                self.version,
                &*VERSION
            ));
        }
        if self.session.retry_limit() == 0 {
            return Err(anyhow!("session.retry_limit must be at least 1"));
        }
        Ok(())
    }
}

impl Default for ConfigBody {
    fn default() -> Self {
        Self {
            version: VERSION.clone(),
            base_url: Self::default_base_url(),
            session: SessionConfig::default(),
            editor: EditorConfig::default(),
            settings_path: DATA_LOCAL_DIR.join(Self::SETTINGS_FILE_NAME),
        }
    }
}

#[derive(Serialize, Deserialize, Getters, Debug, Default, Clone, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct EditorConfig {
    /// Command line of an external editor, e.g. `vim` or `code --wait`.
    /// Split with shell quoting rules, so `"/opt/My Editor/bin/edit" --wait` works.
    #[get = "pub"]
    command: Option<String>,
}

impl EditorConfig {
    const ENV_NAMES: &'static [&'static str] = &["VISUAL", "EDITOR"];

    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    /// The configured command, else the first of `$VISUAL` and `$EDITOR` that is set.
    pub fn resolve_command(&self) -> Option<String> {
        self.command
            .clone()
            .or_else(|| {
                Self::ENV_NAMES
                    .iter()
                    .find_map(|name| env::var(name).ok())
            })
            .filter(|command| !command.trim().is_empty())
    }
}

mod string_serde {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}
