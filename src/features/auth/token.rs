use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{Claims, CurrentUser, Role};

/// Issues and verifies the HS256 bearer tokens that carry the request
/// identity.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: config.token_ttl,
        }
    }

    pub fn issue(&self, participant_id: i32, role: Role) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: participant_id.to_string(),
            role: role.code().to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign token: {:?}", e);
            AppError::Internal("Failed to issue token".to_string())
        })
    }

    pub fn verify(&self, token: &str) -> Result<CurrentUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        let participant_id = data
            .claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(CurrentUser {
            participant_id,
            role: Role::from_db(Some(&data.claims.role)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl: Duration::from_secs(3600),
        })
    }

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let svc = service();
        let token = svc.issue(42, Role::Admin).unwrap();
        let user = svc.verify(&token).unwrap();
        assert_eq!(user.participant_id, 42);
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let mut token = svc.issue(42, Role::Participant).unwrap();
        token.push('x');
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let svc = service();
        let other = TokenService::new(&AuthConfig {
            jwt_secret: "other-secret".to_string(),
            token_ttl: Duration::from_secs(3600),
        });
        let token = other.issue(1, Role::Participant).unwrap();
        assert!(svc.verify(&token).is_err());
    }
}
