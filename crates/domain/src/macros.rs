//! Macro for implementing Display and FromStr for closed label enums
//!
//! Used for the small enums whose string form shows up in logs and stored
//! documents (sync kinds, notice levels, interstitials). Parsing is
//! case-insensitive and strict; lenient parsing (such as stored role strings)
//! is written by hand next to the type.
//!
//! # Example
//!
//! ```rust
//! use maayegue_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Theme {
//!     Light,
//!     Dark,
//!     System,
//! }
//!
//! impl_domain_status_conversions!(Theme {
//!     Light => "light",
//!     Dark => "dark",
//!     System => "system",
//! });
//!
//! assert_eq!(Theme::Dark.to_string(), "dark");
//! assert_eq!("SYSTEM".parse::<Theme>(), Ok(Theme::System));
//! ```

/// Implements Display and FromStr traits for label enums
///
/// - Display writes the given lowercase label
/// - FromStr matches labels case-insensitively and names the enum in the
///   error message
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
