use thiserror::Error;

#[derive(Debug, Error)]
pub enum DipiError {

    #[error("could not resolve variable: {{{0}}}")]
    UnresolvedVariable(String),

    #[error("incorrect destination: {0}")]
    MalformedDestination(String),

    #[error("did not understand {0}")]
    UnrecognizedCommand(String),

    #[error("could not set {0}")]
    InvalidAssignment(String),

    #[error("did not understand run {0}")]
    InvalidRunSyntax(String),

    #[error("cannot get src/dest from copy {0}")]
    InvalidCopySyntax(String),

    #[error("failed to read {0}")]
    InstructionFileRead(String, #[source] std::io::Error),

    #[error("no instructions in {0}")]
    EmptyInstructionFile(String),

    #[error("could not connect to {target}: {reason}")]
    RemoteConnection { target: String, reason: String },

    #[error("remote command failed with code {code:?} and signal {signal:?}\n{stderr}")]
    RemoteCommand {
        code: Option<i32>,
        signal: Option<String>,
        stderr: String,
    },

    #[error("local command failed\n{stderr}")]
    LocalCommand { stderr: String },

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("SSH error")]
    Ssh(#[from] ssh2::Error),

    #[error("Regex error")]
    Regex(#[from] regex::Error),
}
