use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered privilege tier attached to every account.
///
/// Backed by a plain integer so every comparison is an integer comparison:
/// `BANNED(-1) < DEFAULT(0) < USER(1) < MODERATOR(2) < ADMIN(3)`.
///
/// `DEFAULT` doubles as the "open endpoint" sentinel: an operation declared
/// at `DEFAULT` is admitted without looking at any credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct AccessLevel(i32);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown access level: {0}")]
pub struct InvalidAccessLevel(pub i32);

impl AccessLevel {
    pub const BANNED: Self = Self(-1);
    pub const DEFAULT: Self = Self(0);
    pub const USER: Self = Self(1);
    pub const MODERATOR: Self = Self(2);
    pub const ADMIN: Self = Self(3);

    /// Every tier, lowest first.
    pub const ALL: [Self; 5] = [
        Self::BANNED,
        Self::DEFAULT,
        Self::USER,
        Self::MODERATOR,
        Self::ADMIN,
    ];

    pub const fn value(self) -> i32 {
        self.0
    }

    pub fn is_banned(self) -> bool {
        self < Self::DEFAULT
    }

    /// Whether an account at this level may call an operation declared at
    /// `required`. `DEFAULT` admits everyone.
    pub fn admits(self, required: AccessLevel) -> bool {
        required == Self::DEFAULT || self >= required
    }

    pub fn name(self) -> &'static str {
        match self.0 {
            -1 => "banned",
            0 => "default",
            1 => "user",
            2 => "moderator",
            3 => "admin",
            _ => "unknown",
        }
    }
}

impl TryFrom<i32> for AccessLevel {
    type Error = InvalidAccessLevel;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|level| level.0 == value)
            .ok_or(InvalidAccessLevel(value))
    }
}

impl From<AccessLevel> for i32 {
    fn from(level: AccessLevel) -> Self {
        level.0
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.0)
    }
}
