use std::fmt;

use serde::{Deserialize, Serialize};

pub type LangId = String;

pub type LangIdRef<'a> = &'a str;

/// One entry of the remote language selector, in the remote order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct LangOption {
    pub value: LangId,
    pub text: String,
    pub selected: bool,
}

/// One entry of the remote problem selector, in the remote order.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ProblemOption {
    pub value: String,
    pub text: String,
    pub time_limit: Option<String>,
    pub memory_limit: Option<String>,
    pub input_file: Option<String>,
    pub output_file: Option<String>,
}

impl ProblemOption {
    /// Limits as shown in the panel toolbar, `?` for unknown values.
    pub fn limits_label(&self) -> String {
        format!(
            "{}s, {}MB",
            self.time_limit.as_deref().unwrap_or("?"),
            self.memory_limit.as_deref().unwrap_or("?")
        )
    }
}

impl fmt::Display for LangOption {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:>4} {}", self.value, self.text)
    }
}
