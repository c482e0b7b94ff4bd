//! Connection setup roles (RFC 4145 `a=setup`)
//!
//! The offer/answer exchange decides which endpoint opens the TCP
//! connection. Resolution is a lookup in [`RESOLUTION_TABLE`], indexed by the
//! local and remote roles, so every pairing has an explicit outcome.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{MediaSessionError, Result};

/// Value of the `setup` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetupRole {
    /// The endpoint opens the connection
    Active,
    /// The endpoint accepts the connection
    Passive,
    /// Either, the peer decides
    Actpass,
    /// No connection for now
    Holdconn,
}

impl SetupRole {
    pub const ALL: [SetupRole; 4] = [
        SetupRole::Active,
        SetupRole::Passive,
        SetupRole::Actpass,
        SetupRole::Holdconn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SetupRole::Active => "active",
            SetupRole::Passive => "passive",
            SetupRole::Actpass => "actpass",
            SetupRole::Holdconn => "holdconn",
        }
    }

    /// Role an answerer should put in its answer to an offer carrying `offer`
    pub fn preferred_answer(offer: SetupRole) -> SetupRole {
        match offer {
            SetupRole::Actpass => SetupRole::Active,
            SetupRole::Active => SetupRole::Passive,
            SetupRole::Passive => SetupRole::Active,
            SetupRole::Holdconn => SetupRole::Holdconn,
        }
    }

    fn index(self) -> usize {
        match self {
            SetupRole::Active => 0,
            SetupRole::Passive => 1,
            SetupRole::Actpass => 2,
            SetupRole::Holdconn => 3,
        }
    }
}

impl fmt::Display for SetupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetupRole {
    type Err = MediaSessionError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        SetupRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| MediaSessionError::InvalidRole(s.to_string()))
    }
}

/// Outcome of matching a local role against a remote role, from the local side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleResolution {
    /// Local endpoint connects
    Active,
    /// Local endpoint listens
    Passive,
    /// Nobody connects yet
    Holdconn,
    /// Both sides insist on the same direction
    Conflict,
    /// Both sides deferred (`actpass` on each end)
    Indeterminate,
}

impl RoleResolution {
    /// The resolved local role, or `None` for a failed resolution
    pub fn role(self) -> Option<SetupRole> {
        match self {
            RoleResolution::Active => Some(SetupRole::Active),
            RoleResolution::Passive => Some(SetupRole::Passive),
            RoleResolution::Holdconn => Some(SetupRole::Holdconn),
            RoleResolution::Conflict | RoleResolution::Indeterminate => None,
        }
    }
}

use RoleResolution as R;

/// `RESOLUTION_TABLE[local][remote]`, rows and columns in `SetupRole::ALL` order
pub const RESOLUTION_TABLE: [[RoleResolution; 4]; 4] = [
    // remote: active, passive, actpass, holdconn
    // local active
    [R::Conflict, R::Active, R::Active, R::Holdconn],
    // local passive
    [R::Passive, R::Conflict, R::Passive, R::Holdconn],
    // local actpass
    [R::Passive, R::Active, R::Indeterminate, R::Holdconn],
    // local holdconn
    [R::Holdconn, R::Holdconn, R::Holdconn, R::Holdconn],
];

/// Look up the outcome for a local/remote role pair
pub fn resolve_role(local: SetupRole, remote: SetupRole) -> RoleResolution {
    RESOLUTION_TABLE[local.index()][remote.index()]
}

/// Resolve to a usable local role or a `RoleConflict` error
pub fn negotiate_role(local: SetupRole, remote: SetupRole) -> Result<SetupRole> {
    let outcome = resolve_role(local, remote);
    outcome.role().ok_or(MediaSessionError::RoleConflict {
        local,
        remote,
        outcome,
    })
}
