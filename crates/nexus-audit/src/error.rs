use std::fmt;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    msg: String,
}

// The scan must keep these apart: a transport failure aborts the whole run,
// a walk failure is local, and neither means an artifact is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Walk,
    Transport,
    Report,
    Cancelled,
    Internal,
}

impl Error {
    fn new<M: Into<String>>(kind: ErrorKind, msg: M) -> Self {
        Self {
            kind,
            msg: msg.into(),
        }
    }

    pub fn config<M: Into<String>>(msg: M) -> Self {
        Self::new(ErrorKind::Config, msg)
    }

    pub fn walk<M: Into<String>>(msg: M) -> Self {
        Self::new(ErrorKind::Walk, msg)
    }

    pub fn transport<M: Into<String>>(msg: M) -> Self {
        Self::new(ErrorKind::Transport, msg)
    }

    pub fn report<M: Into<String>>(msg: M) -> Self {
        Self::new(ErrorKind::Report, msg)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "scan cancelled")
    }

    pub fn internal<M: Into<String>>(msg: M) -> Self {
        Self::new(ErrorKind::Internal, msg)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.msg)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
