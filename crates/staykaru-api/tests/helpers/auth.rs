use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use staykaru_api::auth::models::JwtClaims;

/// Secret shared by the test app config and the tokens minted here
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

fn mint(secret: &str, sub: &str, exp: i64) -> String {
    let claims = JwtClaims {
        sub: sub.to_string(),
        email: Some(format!("{}@example.com", sub)),
        role: Some("provider".to_string()),
        exp,
        iat: Some(chrono::Utc::now().timestamp()),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode token")
}

/// Valid token for one hour
pub fn bearer_token(sub: &str) -> String {
    mint(TEST_JWT_SECRET, sub, chrono::Utc::now().timestamp() + 3600)
}

pub fn expired_token(sub: &str) -> String {
    mint(TEST_JWT_SECRET, sub, chrono::Utc::now().timestamp() - 3600)
}

pub fn token_with_wrong_secret(sub: &str) -> String {
    mint(
        "some-other-secret-that-is-also-long-enough",
        sub,
        chrono::Utc::now().timestamp() + 3600,
    )
}
