//! Process identities used as notification targets.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A strictly positive process ID.
///
/// Zero and negative values have group or broadcast meaning for `kill(2)`,
/// so they are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid(i32);

impl Pid {
    /// Wraps `raw` if it is strictly positive.
    pub const fn new(raw: i32) -> Option<Self> {
        if raw > 0 { Some(Self(raw)) } else { None }
    }

    /// PID of the calling process.
    #[cfg(unix)]
    pub fn current() -> Self {
        // getpid(2) cannot fail and never returns 0 or a negative value.
        Self(nix::unistd::getpid().as_raw())
    }

    /// Raw `pid_t` value.
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Pid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("invalid PID: {s:?}")))?;
        Self::new(raw)
            .ok_or_else(|| Error::InvalidArgument(format!("PID must be positive, got {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive() {
        assert_eq!("42".parse::<Pid>().unwrap().as_raw(), 42);
        assert_eq!(" 7\n".parse::<Pid>().unwrap().as_raw(), 7);
        assert_eq!("+9".parse::<Pid>().unwrap().as_raw(), 9);
    }

    #[test]
    fn rejects_zero_and_negative() {
        for bad in ["0", "-1", "-4242"] {
            let err = bad.parse::<Pid>().unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{bad}: {err}");
        }
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "abc", "12abc", "99999999999"] {
            assert!(bad.parse::<Pid>().is_err(), "{bad:?} parsed");
        }
    }

    #[cfg(unix)]
    #[test]
    fn current_matches_process_id() {
        assert!(Pid::current().as_raw() > 0);
        assert_eq!(Pid::current().to_string(), std::process::id().to_string());
    }
}
