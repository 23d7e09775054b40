use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): Command completed; `localize` stays here even when some
///   literals were left for review
/// - `Failure` (1): `scan` found localizable strings, `repair` left sites
///   unrepaired, or `init` found an existing config
/// - `Error` (2): Fatal error (config, dictionary, source root)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Command completed successfully.
    Success,
    /// Command completed but left work to do.
    Failure,
    /// Command failed due to a fatal error.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
