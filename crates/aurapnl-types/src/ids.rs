//! Type-safe identifier wrappers around [`u32`].
//!
//! Every entity in the simulation has a strongly-typed ID to prevent
//! accidental mixing of identifiers at compile time. IDs are dense,
//! zero-based indices assigned by the world initializer in creation order,
//! so they are stable across runs with the same seed and double as the
//! deterministic tie-break key during target acquisition.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around [`u32`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u32);

        impl $name {
            /// Create an identifier from its raw index.
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Return the inner index value.
            pub const fn into_inner(self) -> u32 {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self(index)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent (wallet blob). The hero is always `0`.
    AgentId
}

define_id! {
    /// Unique identifier for a reward token.
    TokenId
}

define_id! {
    /// Unique identifier for a reward event, derived from the consumed token.
    RewardEventId
}

impl AgentId {
    /// The identifier reserved for the hero agent.
    pub const HERO: Self = Self(0);

    /// Returns `true` if this is the hero's identifier.
    pub const fn is_hero(self) -> bool {
        self.0 == Self::HERO.0
    }
}

impl From<TokenId> for RewardEventId {
    fn from(token: TokenId) -> Self {
        Self(token.0)
    }
}
