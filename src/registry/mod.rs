//! Hardware identifier registry.
//!
//! Closed sets of typed tags that the calibration cache records but never
//! interprets: device models, sensors, analog front-ends, GPIO maps, motors,
//! ASIC variants, plus the small scan-configuration enumerations and the two
//! flag masks.
//!
//! # Wire codes
//!
//! Every member carries an explicit numeric code that is part of the persisted
//! store format. The codes live in a hand-maintained table next to each
//! member, independent of the declaration order, so reordering variants in
//! source never renumbers existing stores. New hardware is added by appending a
//! member with the next free code.
//!
//! Decoding a code that this build does not know fails with
//! [`DecodeError::UnknownCode`](crate::codec::DecodeError::UnknownCode) rather
//! than aliasing to another member.

use thiserror::Error;

/// Error returned when parsing a user-facing option string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} option: '{value}'")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a closed enumeration with an explicit wire-code table.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $kind:literal {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $code:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            strum::Display,
            strum::IntoStaticStr,
            strum::EnumIter,
            strum::EnumCount,
            Default,
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Diagnostic name of this kind of identifier.
            pub const KIND: &'static str = $kind;

            /// Persisted numeric code of this member.
            #[must_use]
            pub const fn code(self) -> u32 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Member for a persisted code, or `None` if this build does not know it.
            #[must_use]
            pub const fn from_code(code: u32) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Human-readable member name.
            #[must_use]
            pub fn name(self) -> &'static str {
                self.into()
            }
        }

        impl $crate::codec::Codec for $name {
            fn encode<W: std::io::Write>(
                &self,
                enc: &mut $crate::codec::Encoder<W>,
            ) -> std::io::Result<()> {
                enc.token(self.code())
            }

            fn decode(
                dec: &mut $crate::codec::Decoder<'_>,
            ) -> Result<Self, $crate::codec::DecodeError> {
                let code: u32 = dec.parse($kind)?;
                Self::from_code(code).ok_or_else(|| dec.unknown_code($kind, code))
            }
        }
    };
}

/// Declares a bit mask over disjoint power-of-two flags.
///
/// Each flag gets a named predicate. `contains` is the has-flag test: a mask
/// has a sub-mask only if every bit of the sub-mask is present.
macro_rules! wire_flags {
    (
        $(#[$meta:meta])*
        pub struct $name:ident : $kind:literal {
            $(
                $(#[$fmeta:meta])*
                const $flag:ident = $bits:expr => $pred:ident;
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(u32);

        impl $name {
            /// The empty mask.
            pub const NONE: Self = Self(0);

            $(
                $(#[$fmeta])*
                pub const $flag: Self = Self($bits);
            )+

            /// Every bit this build defines.
            pub const DEFINED_BITS: u32 = 0 $(| $bits)+;

            const NAMED: &'static [(Self, &'static str)] = &[$((Self::$flag, stringify!($flag)),)+];

            /// Raw mask value as persisted.
            #[must_use]
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Mask from raw bits, or `None` if any undefined bit is set.
            #[must_use]
            pub const fn from_bits(bits: u32) -> Option<Self> {
                if bits & !Self::DEFINED_BITS == 0 {
                    Some(Self(bits))
                } else {
                    None
                }
            }

            /// Bitwise OR of two masks.
            #[must_use]
            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            /// Bitwise AND of two masks.
            #[must_use]
            pub const fn intersection(self, other: Self) -> Self {
                Self(self.0 & other.0)
            }

            /// True if every bit of `which` is set in `self`.
            #[must_use]
            pub const fn contains(self, which: Self) -> bool {
                self.0 & which.0 == which.0
            }

            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            /// Every individually defined flag.
            pub fn all_flags() -> impl Iterator<Item = Self> {
                Self::NAMED.iter().map(|(flag, _)| *flag)
            }

            /// Names of the flags set in this mask, lowest bit first.
            pub fn names(self) -> impl Iterator<Item = &'static str> {
                Self::NAMED
                    .iter()
                    .filter(move |(flag, _)| self.contains(*flag))
                    .map(|(_, name)| *name)
            }

            $(
                #[must_use]
                pub const fn $pred(self) -> bool {
                    self.contains(Self::$flag)
                }
            )+
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.is_empty() {
                    return f.write_str("NONE");
                }
                let names: Vec<&str> = self.names().collect();
                f.write_str(&names.join(" | "))
            }
        }

        impl $crate::codec::Codec for $name {
            fn encode<W: std::io::Write>(
                &self,
                enc: &mut $crate::codec::Encoder<W>,
            ) -> std::io::Result<()> {
                enc.token(self.0)
            }

            fn decode(
                dec: &mut $crate::codec::Decoder<'_>,
            ) -> Result<Self, $crate::codec::DecodeError> {
                let bits: u32 = dec.parse($kind)?;
                Self::from_bits(bits)
                    .ok_or_else(|| dec.unknown_flags($kind, bits & !Self::DEFINED_BITS))
            }
        }
    };
}

pub mod flags;
pub mod ids;
pub mod scan;

pub use flags::{MotorFlags, ScanFlags};
pub use ids::{AdcId, AsicType, GpioId, ModelId, MotorId, SensorId};
pub use scan::{ColorFilter, ColorOrder, ScanColorMode, ScanMethod, StepType};
