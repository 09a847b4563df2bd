//! Usage: Unified application error model (`CODE: message` display, stable exit codes).

use crate::exit_codes;

pub type AppResult<T> = Result<T, AppError>;

/// Failures of the OAuth authorization-code handshake.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("AUTH_PORT_BIND: callback listener bind failed: {0}")]
    PortBind(String),
    #[error("AUTH_MALFORMED_CALLBACK: {0}")]
    MalformedCallback(String),
    #[error("AUTH_EXCHANGE: token endpoint returned status={status}: {message}")]
    Exchange { status: u16, message: String },
    #[error("AUTH_TIMEOUT: no authorization callback received within {0}s")]
    Timeout(u64),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The name is already taken on the provider. Expected and user-actionable;
    /// retrying with the same name would reproduce the identical conflict.
    #[error("NAME_CONFLICT: a repository named '{name}' already exists")]
    NameConflict { name: String },

    #[error("PROVIDER_ERROR: provider returned status={status}: {message}")]
    Provider { status: u16, message: String },

    /// Explicit decline to reuse an existing local repository. Not a failure.
    #[error("CANCELLED: operation cancelled")]
    Cancelled,

    /// A local remote/branch mutation failed. Fatal for the whole run; no
    /// partial publish is attempted.
    #[error("GIT_STATE: {0}")]
    GitState(String),

    #[error("PUSH_FAILED: {0}")]
    Push(String),

    #[error("CONFIG_ERROR: {0}")]
    Config(String),

    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Auth(_) => exit_codes::AUTH,
            AppError::NameConflict { .. } => exit_codes::NAME_CONFLICT,
            AppError::Provider { .. } => exit_codes::PROVIDER,
            AppError::Cancelled => exit_codes::CANCELLED,
            AppError::GitState(_) => exit_codes::GIT_STATE,
            AppError::Push(_) => exit_codes::PUSH,
            AppError::Config(_) | AppError::Io(_) => exit_codes::CONFIG,
        }
    }
}
