//! Stable process exit codes, one per error kind.

/// Run completed and the repository was pushed.
pub const OK: i32 = 0;
/// Missing or invalid credentials/configuration, or an I/O failure during setup.
pub const CONFIG: i32 = 1;
/// User declined to reuse an existing local repository. Not a failure.
pub const CANCELLED: i32 = 2;
/// The requested repository name already exists on the provider.
pub const NAME_CONFLICT: i32 = 3;
/// Any other provider API failure.
pub const PROVIDER: i32 = 4;
/// A local remote/branch mutation failed or the reconciled state check failed.
pub const GIT_STATE: i32 = 5;
/// The initial push was rejected.
pub const PUSH: i32 = 6;
/// OAuth handshake failure (bind, malformed callback, exchange, timeout).
pub const AUTH: i32 = 10;
