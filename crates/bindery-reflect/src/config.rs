//! Process-wide accessor configuration.
//!
//! The invocation mode is read once from `BINDERY_INVOCATION`:
//! `compiled` (default) or `reflective`. Reflective mode skips direct
//! adapters everywhere, which is useful when comparing behavior or when
//! diagnosing a suspected adapter problem.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use thiserror::Error;

/// How accessors invoke resolved methods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvocationMode {
    /// Bind method bodies into direct adapters, falling back per accessor.
    #[default]
    Compiled,
    /// Always resolve and check methods by name.
    Reflective,
}

/// Unrecognized [`InvocationMode`] text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown invocation mode '{0}' (expected 'compiled' or 'reflective')")]
pub struct ParseModeError(String);

impl FromStr for InvocationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("compiled") {
            Ok(Self::Compiled)
        } else if s.eq_ignore_ascii_case("reflective") {
            Ok(Self::Reflective)
        } else {
            Err(ParseModeError(s.to_owned()))
        }
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Compiled => "compiled",
            Self::Reflective => "reflective",
        })
    }
}

impl InvocationMode {
    /// Environment variable consulted by [`InvocationMode::global`].
    pub const ENV_VAR: &'static str = "BINDERY_INVOCATION";

    /// The mode configured for this process, read from the environment once.
    #[must_use]
    pub fn global() -> Self {
        static GLOBAL: OnceLock<InvocationMode> = OnceLock::new();
        *GLOBAL.get_or_init(Self::from_env)
    }

    /// Read the mode from [`Self::ENV_VAR`].
    #[must_use]
    pub fn from_env() -> Self {
        let raw = env::var(Self::ENV_VAR).ok();
        Self::from_env_value(raw.as_deref())
    }

    fn from_env_value(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Self::default(),
            Some(raw) => raw.parse().unwrap_or_else(|err: ParseModeError| {
                tracing::warn!(%err, "ignoring {}", Self::ENV_VAR);
                Self::default()
            }),
        }
    }

    /// Whether accessors should attempt direct adapters.
    #[must_use]
    pub fn compiles(self) -> bool {
        self == Self::Compiled
    }
}
