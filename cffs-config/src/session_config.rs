use std::time::Duration;

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::abs_path::AbsPathBuf;
use crate::DATA_LOCAL_DIR;

static COOKIES_FILE_NAME: &str = "cookies.json";

#[derive(Serialize, Deserialize, Getters, CopyGetters, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(with = "humantime_serde")]
    #[get_copy = "pub"]
    timeout: Duration,
    #[get = "pub"]
    cookies_path: AbsPathBuf,
    /// Attempts made to acquire the submit form before giving up.
    #[get_copy = "pub"]
    retry_limit: usize,
    #[serde(with = "humantime_serde")]
    #[get_copy = "pub"]
    retry_interval: Duration,
    /// Age after which acquired tokens are regenerated before submitting.
    #[serde(with = "humantime_serde")]
    #[get_copy = "pub"]
    regenerate_interval: Duration,
    #[get_copy = "pub"]
    redirect_limit: usize,
}

impl SessionConfig {
    fn default_cookies_path() -> AbsPathBuf {
        DATA_LOCAL_DIR.join(COOKIES_FILE_NAME)
    }

    pub(crate) fn in_dir(dir: &AbsPathBuf) -> Self {
        Self {
            cookies_path: dir.join(COOKIES_FILE_NAME),
            ..Self::default()
        }
    }

    /// Same session with a different retry policy.
    pub fn with_retry(mut self, retry_limit: usize, retry_interval: Duration) -> Self {
        self.retry_limit = retry_limit;
        self.retry_interval = retry_interval;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            cookies_path: Self::default_cookies_path(),
            retry_limit: 20,
            retry_interval: Duration::from_millis(1000),
            regenerate_interval: Duration::from_secs(30 * 60),
            redirect_limit: 10,
        }
    }
}
