// SPDX-License-Identifier: MIT OR Apache-2.0

//! Numeric identifiers of stored records.
//!
//! Every record family gets its own newtype so a staff id can never be passed where a software id
//! is expected. Stores hand out identifiers starting at `1`, an id of `0` is never valid.
use std::fmt::Display;
use std::num::{NonZeroU64, ParseIntError};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(try_from = "u64", into = "u64")]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw identifier, rejecting the reserved value `0`.
            pub fn new(value: u64) -> Result<Self, IdError> {
                if value == 0 {
                    return Err(IdError::Zero(stringify!($name)));
                }
                Ok(Self(value))
            }

            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<NonZeroU64> for $name {
            fn from(value: NonZeroU64) -> Self {
                Self(value.get())
            }
        }

        impl TryFrom<u64> for $name {
            type Error = IdError;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::new(value.parse::<u64>()?)
            }
        }
    };
}

id_type!(
    /// Identifier of a staff member.
    StaffId
);
id_type!(
    /// Identifier of a software catalog entry.
    SoftwareId
);
id_type!(
    /// Identifier of a department.
    DepartmentId
);
id_type!(
    /// Identifier of a team.
    TeamId
);
id_type!(
    /// Identifier of a single staff ↔ software assignment edge.
    AssignmentId
);
id_type!(
    /// Identifier of an organization, department or team match rule.
    MatchId
);
id_type!(
    /// Identifier of an audit log entry.
    LogId
);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("{0} can not be zero")]
    Zero(&'static str),

    #[error("invalid identifier: {0}")]
    Parse(#[from] ParseIntError),
}
