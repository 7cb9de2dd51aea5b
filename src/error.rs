use crate::session::SessionState;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// The line-editing surface could not be opened.
///
/// Returned when a session is created and when it resumes; the caller decides
/// whether to abort.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to open line editor: {0}")]
    Editor(#[from] ReadlineError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error("read failed: {0}")]
    Read(#[source] ReadlineError),

    #[error("cannot {action} a session that is {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },
}
