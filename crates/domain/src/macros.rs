//! Macro for implementing Display and FromStr for wire-level enums
//!
//! Roles and statuses travel as lowercase strings in query parameters and
//! JSON bodies. This macro keeps both directions of that conversion in one
//! place with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use medibook_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum AppointmentStatus {
//!     Booked,
//!     Cancelled,
//! }
//!
//! impl_domain_status_conversions!(AppointmentStatus {
//!     Booked => "booked",
//!     Cancelled => "cancelled",
//! });
//! ```

/// Implements Display and FromStr traits for lowercase wire enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
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
