//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Directory enums travel as camelCase tags (`servicePrincipal`,
//! `directoryObject`). This macro keeps the canonical spelling on output and
//! accepts any casing on input.
//!
//! # Example
//!
//! ```rust
//! use dirgraph_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Audience {
//!     SingleTenant,
//!     MultiTenant,
//! }
//!
//! impl_wire_name_conversions!(Audience {
//!     SingleTenant => "singleTenant",
//!     MultiTenant => "multiTenant",
//! });
//!
//! assert_eq!(Audience::MultiTenant.to_string(), "multiTenant");
//! assert_eq!("SINGLETENANT".parse::<Audience>().unwrap(), Audience::SingleTenant);
//! ```

/// Implements Display and FromStr for enums with a fixed wire name per variant
///
/// This macro generates:
/// - Display trait: writes the canonical wire name
/// - FromStr trait: ASCII case-insensitive match against the wire names
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
