/// Inclusive bounds on a count.
///
/// Every argument carries two of these: the appearance bounds (how many times
/// the flag may repeat on the command line) and the width bounds (how many
/// tokens a single appearance consumes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Lower bound.
    pub at_least: u32,
    /// Upper bound (inclusive); `u32::MAX` means unbounded.
    pub at_most: u32,
}

impl Limits {
    /// Create bounds `at_least..=at_most`.
    pub fn new(at_least: u32, at_most: u32) -> Self {
        Self { at_least, at_most }
    }

    /// Create exact bounds `n..=n`.
    pub fn exactly(n: u32) -> Self {
        Self::new(n, n)
    }

    /// Compact rendering used by help text, e.g. `[2~3]` or `[1~N]`.
    pub(crate) fn compact(&self) -> String {
        if self.at_most == u32::MAX {
            format!("[{}~N]", self.at_least)
        } else {
            format!("[{}~{}]", self.at_least, self.at_most)
        }
    }
}

impl std::fmt::Display for Limits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.at_least == self.at_most {
            write!(f, "{}", self.at_least)
        } else if self.at_most == u32::MAX {
            write!(f, "{} ~ N", self.at_least)
        } else {
            write!(f, "{} ~ {}", self.at_least, self.at_most)
        }
    }
}

/// Compose an under-count message, e.g. `expects 2 ~ 3 value(s), but got 1`.
pub(crate) fn expects(limits: &Limits, noun: &str, got: u32) -> String {
    format!("expects {limits} {noun}, but got {got}")
}

/// Policy governing whether a token that looks like an option name ends value
/// consumption for the current field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sensing {
    /// Only a `-`-prefixed token that fails conversion ends consumption;
    /// negative numbers bind, string fields absorb anything.
    #[default]
    Lenient,
    /// Any token matching a registered flag/name/alias ends consumption,
    /// even if it would convert.
    ByName,
    /// Nothing ends consumption except the bare `--` delimiter.
    AtEof,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Limits::exactly(2), "2")]
    #[case(Limits::new(2, 3), "2 ~ 3")]
    #[case(Limits::new(1, u32::MAX), "1 ~ N")]
    fn limits_display(#[case] limits: Limits, #[case] expected: &str) {
        assert_eq!(limits.to_string(), expected);
    }

    #[test]
    fn limits_compact() {
        assert_eq!(Limits::new(0, u32::MAX).compact(), "[0~N]");
        assert_eq!(Limits::new(2, 3).compact(), "[2~3]");
    }

    #[test]
    fn expects_message() {
        assert_eq!(
            expects(&Limits::new(2, 3), "value(s)", 1),
            "expects 2 ~ 3 value(s), but got 1"
        );
        assert_eq!(
            expects(&Limits::exactly(2), "appearance(s)", 0),
            "expects 2 appearance(s), but got 0"
        );
    }
}
