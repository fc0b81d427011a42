/// Delimiter that opens (and separates) the trailing token region.
pub(crate) const EOF_DELIMITER: &str = "--";

/// Prefix that forces the following token to bind literally, even when it
/// looks like an option name.
pub(crate) const ESCAPE: char = '\\';

/// Help width used when the terminal width cannot be determined.
pub(crate) const FALLBACK_HELP_WIDTH: usize = 100;
