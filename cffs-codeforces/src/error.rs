use std::error::Error as StdError;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Failures a submission session reports to the user.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The address is not a problem page of a supported shape. Terminal.
    #[error("Not a valid problem page : {0}")]
    Classification(String),
    /// No usable submit form after every attempt. Terminal for the session.
    #[error("Failed to initialize after {attempts} attempts")]
    Acquisition {
        attempts: usize,
        #[source]
        source: BoxError,
    },
    /// The panel is not idle, e.g. the solution was already dispatched. Nothing was sent.
    #[error("Submit is disabled : {0}")]
    NotIdle(String),
    /// Source is empty or whitespace only. Nothing was sent.
    #[error("Please enter your code")]
    EmptySource,
    /// Assembling or dispatching the request failed. The user may retry.
    #[error("Error submitting. Please try again.")]
    Submission(#[source] BoxError),
}

impl SubmitError {
    pub(crate) fn acquisition(attempts: usize, err: anyhow::Error) -> Self {
        Self::Acquisition {
            attempts,
            source: err.into(),
        }
    }

    pub(crate) fn submission(err: anyhow::Error) -> Self {
        Self::Submission(err.into())
    }

    /// Whether the user can try again without reloading the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptySource | Self::Submission(_))
    }
}
