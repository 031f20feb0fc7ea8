use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Claims read from an access token issued by the identity provider
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id as string
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

/// Verify and decode an HS256 access token
///
/// `audience` is checked against the `aud` claim when given.
pub fn verify_jwt_token(
    token: &str,
    jwt_secret: &str,
    audience: Option<&str>,
) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        ApiError::Auth("Invalid or expired token".to_string())
    })?;

    Ok(token_data.claims)
}
