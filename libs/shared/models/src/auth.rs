use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_DOCTOR: &str = "doctor";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_PATIENT: &str = "patient";

pub const VALID_ROLES: [&str; 4] = [ROLE_ADMIN, ROLE_DOCTOR, ROLE_STAFF, ROLE_PATIENT];

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Claim set embedded in every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// Decoded caller identity, attached to request extensions by the auth
/// middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn is_doctor(&self) -> bool {
        self.role == ROLE_DOCTOR || self.role == ROLE_ADMIN
    }
}
