use std::io;
use std::path::PathBuf;

use moxydoc_render::RenderError;
use thiserror::Error;

/// Process exit codes shared by the moxydoc front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    /// Generic failure, also used when check mode finds stale documents.
    Failure = 1,
    Config = 2,
    Routing = 3,
    Io = 4,
}

impl ExitCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Success),
            1 => Some(Self::Failure),
            2 => Some(Self::Config),
            3 => Some(Self::Routing),
            4 => Some(Self::Io),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("no groups found; groups output needs at least one documented group")]
    NoGroups,

    #[error("no classes found; classes output needs at least one documented class")]
    NoClasses,

    #[error("no pages found; pages output needs at least one documented page")]
    NoPages,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to access {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl OperationError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::NoGroups | Self::NoClasses | Self::NoPages => ExitCode::Routing,
            Self::Render(RenderError::Io { .. }) | Self::Io { .. } => ExitCode::Io,
            Self::Render(_) => ExitCode::Failure,
        }
    }
}

pub type OperationResult<T> = Result<T, OperationError>;
