use anyhow::{Context, Result};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Profile fields the identity provider attaches to a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>, // Provider sets "authenticated" for signed-in users
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    pub exp: usize, // Expiration time (as UTC timestamp)
    pub iat: usize, // Issued at (as UTC timestamp)
}

/// Tokens are minted by the identity provider; this side only checks them.
///
/// With an `audience`, a token whose `aud` names something else is rejected.
/// Without one, `aud` is ignored.
pub fn validate_token(token: &str, secret: &str, audience: Option<&str>) -> Result<Claims> {
    let mut validation = Validation::default();
    match audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .context("Failed to decode JWT")?;

    Ok(token_data.claims)
}

/// Token shaped like the provider's session tokens, `aud` included.
#[cfg(test)]
pub fn create_token(
    user_id: &str,
    email: Option<&str>,
    full_name: Option<&str>,
    secret: &str,
) -> String {
    create_token_for(user_id, email, full_name, Some("authenticated"), secret)
}

#[cfg(test)]
pub fn create_token_for(
    user_id: &str,
    email: Option<&str>,
    full_name: Option<&str>,
    audience: Option<&str>,
    secret: &str,
) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        aud: audience.map(String::from),
        email: email.map(String::from),
        user_metadata: UserMetadata {
            full_name: full_name.map(String::from),
            avatar_url: None,
        },
        exp: (now + chrono::Duration::hours(1)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
