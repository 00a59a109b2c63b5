use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;

pub type Result<T> = std::result::Result<T, NeatError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidConfig,
    InvalidParameter,
    Engine,
    Evaluation,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrString(Cow<'static, str>);

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<Cow<'static, str>>> From<T> for ErrString {
    fn from(v: T) -> Self {
        Self(v.into())
    }
}

/// The error type shared by every crate in this engine.
///
/// `NeatError` is intentionally small: most of what the core does is
/// recoverable by design (see the saturated-topology and stagnant-population
/// fallbacks), so this type only needs to carry the handful of conditions
/// that are genuinely exceptional - bad configuration, a collaborator
/// (`Simulation`) that breaks its contract, or a bug surfaced as an invalid
/// parameter.
#[derive(Debug)]
pub enum NeatError {
    InvalidConfig { message: ErrString },
    InvalidParameter { message: ErrString },
    Engine { message: ErrString },
    Evaluation { message: ErrString },
    Context {
        context: ErrorContext,
        source: Box<NeatError>,
    },
}

impl NeatError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            Self::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            Self::Engine { .. } => ErrorCode::Engine,
            Self::Evaluation { .. } => ErrorCode::Evaluation,
            Self::Context { .. } => ErrorCode::Context,
        }
    }

    pub fn with_context(self, msg: impl Into<String>) -> Self {
        NeatError::Context {
            context: ErrorContext::new(msg),
            source: Box::new(self),
        }
    }
}

impl Display for NeatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { message } => write!(f, "invalid configuration: {message}"),
            Self::InvalidParameter { message } => write!(f, "invalid parameter: {message}"),
            Self::Engine { message } => write!(f, "engine error: {message}"),
            Self::Evaluation { message } => write!(f, "evaluation error: {message}"),
            Self::Context { context, source } => write!(f, "{context}\ncaused by: {source}"),
        }
    }
}

impl std::error::Error for NeatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Context { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ErrorContext {
    message: String,
}

impl ErrorContext {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Shorthand for constructing a tagged [NeatError] variant, mirroring the
/// ergonomics of `anyhow!`/`thiserror` macros without pulling in either.
///
/// ```
/// use neat_error::neat_err;
/// let err = neat_err!(InvalidConfig: "population_size must be > 0");
/// ```
#[macro_export]
macro_rules! neat_err {
    (InvalidConfig: $($arg:tt)*) => {
        $crate::NeatError::InvalidConfig { message: format!($($arg)*).into() }
    };
    (InvalidParameter: $($arg:tt)*) => {
        $crate::NeatError::InvalidParameter { message: format!($($arg)*).into() }
    };
    (Engine: $($arg:tt)*) => {
        $crate::NeatError::Engine { message: format!($($arg)*).into() }
    };
    (Evaluation: $($arg:tt)*) => {
        $crate::NeatError::Evaluation { message: format!($($arg)*).into() }
    };
}

/// Bails out of the current function with a tagged [NeatError] unless the
/// condition holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::neat_err!($variant: $($arg)*));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_with_context_chain() {
        let err = neat_err!(InvalidConfig: "bad field {}", "population_size")
            .with_context("building Config");

        let rendered = err.to_string();
        assert!(rendered.contains("building Config"));
        assert!(rendered.contains("bad field population_size"));
    }

    #[test]
    fn ensure_macro_short_circuits() {
        fn check(n: usize) -> Result<()> {
            ensure!(n > 0, InvalidConfig: "n must be positive, got {n}");
            Ok(())
        }

        assert!(check(1).is_ok());
        assert_eq!(check(0).unwrap_err().code(), ErrorCode::InvalidConfig);
    }
}
