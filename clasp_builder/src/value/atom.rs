use thiserror::Error;

/// A leaf scalar: one raw token converts into one value, or fails with the
/// canonical description of what was expected.
///
/// The description doubles as the error payload so that "no value present"
/// and "wrong value present" share a single code path in the callers.
pub trait Atom: Sized {
    /// Plain shape name, e.g. `i32` or `string`.
    const NAME: &'static str;

    /// Expected-value description used when the token is absent.
    fn expected() -> String {
        Self::NAME.to_string()
    }

    /// Convert one token; the error carries the expected-value description.
    fn parse_atom(token: &str) -> Result<Self, String>;
}

/// Structured form of an atom conversion failure.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("format error: '{token}', expect a(n) '{expected}' value")]
pub struct Unconvertable {
    /// The offending token.
    pub token: String,
    /// The canonical description of what was expected instead.
    pub expected: String,
}

/// Render an atom failure with the optional field path appended.
pub(crate) fn format_error(token: &str, expected: &str, path: &str) -> String {
    let base = Unconvertable {
        token: token.to_string(),
        expected: expected.to_string(),
    };
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base} for '{path}'")
    }
}

impl Atom for bool {
    const NAME: &'static str = "bool";

    fn expected() -> String {
        "bool{True,true,1,False,false,0}".to_string()
    }

    fn parse_atom(token: &str) -> Result<Self, String> {
        if token.eq_ignore_ascii_case("true") || token == "1" {
            Ok(true)
        } else if token.eq_ignore_ascii_case("false") || token == "0" {
            Ok(false)
        } else {
            Err(Self::expected())
        }
    }
}

impl Atom for String {
    const NAME: &'static str = "string";

    fn parse_atom(token: &str) -> Result<Self, String> {
        Ok(token.to_string())
    }
}

/// Split a numeric token into (negative, radix, digits) by its base prefix.
fn radix_of(token: &str) -> (bool, u32, &str) {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (negative, 16, hex)
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (negative, 2, bin)
    } else {
        (negative, 10, body)
    }
}

macro_rules! integer_atoms {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Atom for $ty {
            const NAME: &'static str = $name;

            fn parse_atom(token: &str) -> Result<Self, String> {
                if token.is_empty() {
                    return Err(Self::expected());
                }
                let (negative, radix, digits) = radix_of(token);
                let magnitude = i128::from_str_radix(digits, radix)
                    .map_err(|_| Self::expected())?;
                let wide = if negative { -magnitude } else { magnitude };
                <$ty>::try_from(wide).map_err(|_| {
                    format!("{}({}~{})", Self::NAME, <$ty>::MIN, <$ty>::MAX)
                })
            }
        }
    )*};
}

integer_atoms!(
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
);

macro_rules! float_atoms {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Atom for $ty {
            const NAME: &'static str = $name;

            fn parse_atom(token: &str) -> Result<Self, String> {
                if token.is_empty() {
                    return Err(Self::expected());
                }
                token.parse::<$ty>().map_err(|_| Self::expected())
            }
        }
    )*};
}

float_atoms!(f32 => "f32", f64 => "f64");
