use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Participant role codes as stored in `Participants.ParticipantRole`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Participant,
    /// Visitor record created via a donation, no account yet
    Donor,
}

impl Role {
    pub fn code(self) -> &'static str {
        match self {
            Role::Admin => "a",
            Role::Participant => "p",
            Role::Donor => "d",
        }
    }

    pub fn from_code(code: &str) -> Option<Role> {
        match code {
            "a" => Some(Role::Admin),
            "p" => Some(Role::Participant),
            "d" => Some(Role::Donor),
            _ => None,
        }
    }

    /// Role for rows whose code is NULL or unrecognized.
    pub fn from_db(code: Option<&str>) -> Role {
        code.and_then(Role::from_code).unwrap_or(Role::Participant)
    }
}

/// Immutable per-request identity, attached by the auth guard and passed into
/// the query layer as a plain value. Visibility decisions (admin sees all,
/// everyone else sees only their own rows) key off this.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct CurrentUser {
    pub participant_id: i32,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// JWT claims carried by the bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Participant id
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_round_trip() {
        for role in [Role::Admin, Role::Participant, Role::Donor] {
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code("x"), None);
    }

    #[test]
    fn null_or_unknown_role_defaults_to_participant() {
        assert_eq!(Role::from_db(None), Role::Participant);
        assert_eq!(Role::from_db(Some("zz")), Role::Participant);
        assert_eq!(Role::from_db(Some("a")), Role::Admin);
    }

    #[test]
    fn only_role_a_is_admin() {
        assert!(CurrentUser { participant_id: 1, role: Role::Admin }.is_admin());
        assert!(!CurrentUser { participant_id: 1, role: Role::Participant }.is_admin());
        assert!(!CurrentUser { participant_id: 1, role: Role::Donor }.is_admin());
    }
}
