//! Verifier user lifecycle status.

use std::fmt;

/// Status of a verifier user (`statusId` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserStatus {
    Created,
    Invited,
    #[default]
    Active,
    Suspended,
    Revoked,
    Unknown(i64),
}

impl UserStatus {
    /// Statuses an administrator can set explicitly.
    pub const CHOICES: [UserStatus; 3] = [
        UserStatus::Active,
        UserStatus::Suspended,
        UserStatus::Revoked,
    ];

    pub fn from_id(id: i64) -> Self {
        match id {
            1 => UserStatus::Created,
            2 => UserStatus::Invited,
            3 => UserStatus::Active,
            4 => UserStatus::Suspended,
            5 => UserStatus::Revoked,
            other => UserStatus::Unknown(other),
        }
    }

    pub fn id(self) -> i64 {
        match self {
            UserStatus::Created => 1,
            UserStatus::Invited => 2,
            UserStatus::Active => 3,
            UserStatus::Suspended => 4,
            UserStatus::Revoked => 5,
            UserStatus::Unknown(id) => id,
        }
    }

    /// Wire label used by the status endpoint.
    pub fn label(self) -> &'static str {
        match self {
            UserStatus::Created => "CREATED",
            UserStatus::Invited => "INVITED",
            UserStatus::Active => "ACTIVE",
            UserStatus::Suspended => "SUSPENDED",
            UserStatus::Revoked => "REVOKED",
            UserStatus::Unknown(_) => "Unknown",
        }
    }

    /// Users up to ACTIVE may receive another invitation.
    pub fn can_reinvite(self) -> bool {
        matches!(
            self,
            UserStatus::Created | UserStatus::Invited | UserStatus::Active
        )
    }

    /// Revoked users are final.
    pub fn can_change(self) -> bool {
        self != UserStatus::Revoked
    }

    /// Initial choice of the status dialog for a user in this status.
    pub fn initial_choice(self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Active,
            UserStatus::Suspended => UserStatus::Suspended,
            _ => UserStatus::Revoked,
        }
    }

    /// Next entry of [`UserStatus::CHOICES`], wrapping.
    pub fn next_choice(self) -> Self {
        let pos = Self::CHOICES.iter().position(|&s| s == self).unwrap_or(0);
        Self::CHOICES[(pos + 1) % Self::CHOICES.len()]
    }

    /// Previous entry of [`UserStatus::CHOICES`], wrapping.
    pub fn prev_choice(self) -> Self {
        let pos = Self::CHOICES.iter().position(|&s| s == self).unwrap_or(0);
        Self::CHOICES[(pos + Self::CHOICES.len() - 1) % Self::CHOICES.len()]
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
