use crate::classify::EngineKind;

/// An error that occurred while compiling, searching with or configuring a
/// regex.
///
/// A search that finds nothing is *not* an error. Searches report that as
/// `Ok(None)` (or `Ok(false)`).
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The pattern could not be compiled by the engine it was routed to.
    Compile(CompileError),
    /// A search started but could not finish, for example because a match or
    /// depth limit was exceeded.
    Match(MatchError),
    /// The regex was released with `close` before the operation started.
    Closed,
    /// A process-wide configuration function was given invalid arguments.
    Config(ConfigError),
}

impl Error {
    pub(crate) fn compile(
        engine: EngineKind,
        code: i32,
        offset: Option<usize>,
        message: String,
    ) -> Error {
        Error::Compile(CompileError { engine, code, offset, message })
    }

    pub(crate) fn matching(kind: MatchErrorKind, code: i32) -> Error {
        Error::Match(MatchError { kind, code })
    }

    pub(crate) fn invalid_argument() -> Error {
        Error::matching(MatchErrorKind::InvalidArgument, 0)
    }

    pub(crate) fn config(message: impl Into<String>) -> Error {
        Error::Config(ConfigError { message: message.into() })
    }

    /// Returns true if and only if this error was caused by a configured
    /// match or depth limit being exceeded.
    pub fn is_limit_exceeded(&self) -> bool {
        matches!(
            *self,
            Error::Match(MatchError { kind: MatchErrorKind::LimitExceeded, .. })
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Compile(ref err) => Some(err),
            Error::Match(ref err) => Some(err),
            Error::Config(ref err) => Some(err),
            Error::Closed => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Error::Compile(ref err) => err.fmt(f),
            Error::Match(ref err) => err.fmt(f),
            Error::Closed => write!(f, "regex has already been closed"),
            Error::Config(ref err) => err.fmt(f),
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Error {
        Error::Compile(err)
    }
}

impl From<MatchError> for Error {
    fn from(err: MatchError) -> Error {
        Error::Match(err)
    }
}

/// An error that occurs when a pattern fails to compile.
///
/// No native resources are held by a failed compilation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompileError {
    engine: EngineKind,
    code: i32,
    offset: Option<usize>,
    message: String,
}

impl CompileError {
    /// The engine the pattern was routed to when it failed.
    pub fn engine(&self) -> EngineKind {
        self.engine
    }

    /// The engine specific error code. This is always `0` for errors reported
    /// by the simple engine.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The byte offset into the pattern where the error was detected. For
    /// the simple engine this is the start of the offending syntax, and it is
    /// `None` when the pattern parsed but was too big to compile.
    pub fn offset(&self) -> Option<usize> {
        self.offset
    }

    /// A human readable description of the error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::error::Error for CompileError {}

impl core::fmt::Display for CompileError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Messages from the simple engine already point at the error.
        match (self.engine, self.offset) {
            (EngineKind::Extended, Some(offset)) => write!(
                f,
                "error compiling pattern at offset {}: {} (code: {})",
                offset, self.message, self.code,
            ),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// The kind of failure that stopped a search.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchErrorKind {
    /// The search start was out of bounds (or not on a character boundary),
    /// or the haystack was rejected by the engine.
    InvalidArgument,
    /// The configured match limit or depth limit was exceeded.
    LimitExceeded,
    /// The match buffer was too small to hold the offsets of a match.
    BufferTooSmall,
    /// The JIT scratch stack could not grow any further.
    JitStackExhausted,
    /// Any other failure reported by the engine.
    Engine,
}

/// An error that occurs when a search could not be completed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchError {
    kind: MatchErrorKind,
    code: i32,
}

impl MatchError {
    /// The kind of failure.
    pub fn kind(&self) -> MatchErrorKind {
        self.kind
    }

    /// The engine specific error code, or `0` when the error was detected
    /// before reaching an engine.
    pub fn code(&self) -> i32 {
        self.code
    }
}

impl std::error::Error for MatchError {}

impl core::fmt::Display for MatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let what = match self.kind {
            MatchErrorKind::InvalidArgument => "invalid search argument",
            MatchErrorKind::LimitExceeded => "match or depth limit exceeded",
            MatchErrorKind::BufferTooSmall => "match buffer too small",
            MatchErrorKind::JitStackExhausted => "JIT stack exhausted",
            MatchErrorKind::Engine => "regex engine failure",
        };
        if self.code == 0 {
            write!(f, "{}", what)
        } else {
            let msg = crate::pcre2::error_message(self.code);
            write!(f, "{}: {} (code: {})", what, msg, self.code)
        }
    }
}

/// An error that occurs when process-wide configuration is given invalid
/// arguments or its native resources could not be allocated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigError {
    message: String,
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}
