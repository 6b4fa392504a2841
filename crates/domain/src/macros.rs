//! Macros for the wire conversions of the API enum tables
//!
//! The API encodes its enumerations either as lowercase strings (agent
//! types, resource names) or as small integers (graph kinds, statuses). The
//! two macros below generate the conversions for both families so the enum
//! declarations stay a plain list of variants.
//!
//! # Example
//!
//! ```rust
//! use bleemeo_domain::{impl_code_conversions, impl_str_conversions};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Flavor {
//!     Vanilla,
//!     Chocolate,
//! }
//!
//! impl_str_conversions!(Flavor {
//!     Vanilla => "vanilla",
//!     Chocolate => "chocolate",
//! });
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Level {
//!     Low,
//!     High,
//! }
//!
//! impl_code_conversions!(Level {
//!     Low => 0,
//!     High => 1,
//! });
//!
//! assert_eq!(Flavor::Chocolate.to_string(), "chocolate");
//! assert_eq!(u8::from(Level::High), 1);
//! ```

/// Implements `Display`, `FromStr` and string-based serde for an enum
///
/// - `Display` writes the wire string
/// - `FromStr` parses case-insensitively
/// - `Serialize` / `Deserialize` go through the wire string
#[macro_export]
macro_rules! impl_str_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
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

        impl serde::Serialize for $enum_name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Implements integer conversions and integer-based serde for an enum
///
/// - `From<Enum> for u8` returns the wire code
/// - `TryFrom<u8>` rejects unknown codes
/// - `Serialize` / `Deserialize` go through the wire code
#[macro_export]
macro_rules! impl_code_conversions {
    ($enum_name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        impl From<$enum_name> for u8 {
            fn from(value: $enum_name) -> Self {
                match value {
                    $($enum_name::$variant => $code,)+
                }
            }
        }

        impl TryFrom<u8> for $enum_name {
            type Error = String;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {} code: {}", stringify!($enum_name), code)),
                }
            }
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(u8::from(*self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let code = u8::deserialize(deserializer)?;
                Self::try_from(code).map_err(serde::de::Error::custom)
            }
        }
    };
}
