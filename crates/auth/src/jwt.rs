//! JWT issuing and validation

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::claims::{Claims, TokenType};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::types::AuthRole;

/// A freshly signed token together with the metadata the caller may persist
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Sign an HS256 token of the given type for a user
pub fn issue_token(
    user_id: Uuid,
    email: &str,
    role: AuthRole,
    token_type: TokenType,
    config: &AuthConfig,
) -> Result<IssuedToken, AuthError> {
    let issued_at = Utc::now();
    let ttl = match token_type {
        TokenType::Access => config.access_token_ttl,
        TokenType::Refresh => config.refresh_token_ttl,
    };
    let expires_at = issued_at + ttl;
    let jti = Uuid::new_v4();

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        token_type,
        jti: jti.to_string(),
        iat: issued_at.timestamp(),
        exp: expires_at.timestamp(),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| {
        tracing::error!(error = %e, user_id = %user_id, "Failed to sign token");
        AuthError::Signing
    })?;

    Ok(IssuedToken {
        token,
        jti,
        issued_at,
        expires_at,
    })
}

/// Validate signature, expiry, issuer/audience and the expected token type
pub fn validate_token(
    token: &str,
    config: &AuthConfig,
    expected: TokenType,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // jsonwebtoken skips iss/aud checks when the claim is absent unless it is required
    let mut required = vec!["exp"];

    if let Some(aud) = &config.audience {
        validation.set_audience(&[aud]);
        required.push("aud");
    } else {
        validation.validate_aud = false;
    }

    if let Some(iss) = &config.issuer {
        validation.set_issuer(&[iss]);
        required.push("iss");
    }
    validation.set_required_spec_claims(&required);

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        AuthError::InvalidToken
    })?;

    if token_data.claims.token_type != expected {
        tracing::debug!(
            expected = %expected,
            actual = %token_data.claims.token_type,
            "JWT has wrong token type"
        );
        return Err(AuthError::WrongTokenType);
    }

    Ok(token_data.claims)
}
