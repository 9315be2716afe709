#![warn(clippy::all)]

#[macro_use]
extern crate strum;

mod acquire;
mod actor;
mod editor;
mod error;
mod freshness;
mod message;
mod mirror;
mod page;
mod panel;
mod session;
mod submit;
mod target;
mod transport;

use cffs_config as config;
use cffs_util::{abs_path, console, model, service};

use crate::console::Console;

pub use acquire::{acquire, Acquisition, Supervisor};
pub use actor::CodeforcesActor;
pub use editor::{
    extension_hint, Editor, EditorAdapter, EditorFactory, PlainEditor, PlainSource, RichEditor,
    SyntaxMode,
};
pub use error::SubmitError;
pub use freshness::FreshnessTimer;
pub use message::{channel, Delivery, Listener, Message, Notifier};
pub use mirror::SourceMirror;
pub use page::{AuthTokens, SubmitForm};
pub use panel::{PanelHost, SubmitPanel, Trigger};
pub use session::Session;
pub use submit::{AmbientTokens, Dispatch, Executor, SubmitState};
pub use target::{PageStatus, Target, TargetKind};
pub use transport::{Fetched, HttpTransport, Transport};

pub type Error = anyhow::Error;
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod testing;
