//! Current admin service
//!
//! Get the current admin from the request based on the Authorization header

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::api::Error;
use crate::users::AdminAccount;

/// Tokens are valid for a working day
const TOKEN_LIFETIME_SECONDS: i64 = 8 * 60 * 60;

/// The keys used for encoding/decoding JWT tokens
#[derive(Clone)]
pub struct JwtKeys {
    /// The encoding key
    encoding: EncodingKey,

    /// The decoding key
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Create new encoding/decoding keys, derived from a secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// The JWT claims to identify the admin
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    /// The username
    sub: String,

    /// Timestamp the token expires at
    exp: i64,

    /// Session ID of the process that issued the token
    jti: Uuid,
}

/// Token information served to the admin
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Type of the token: Bearer
    token_type: &'static str,

    /// In how many seconds does the token expire
    expires_in: i64,

    /// The access token to provide to follow up requests in the Authorization header
    access_token: String,
}

/// The admin making the request
#[derive(Clone, Debug)]
pub struct CurrentUser {
    /// Username of the admin
    pub username: String,
}

/// Generate a token for the admin account
pub fn generate_token(jwt_keys: &JwtKeys, account: &AdminAccount) -> Result<Token, Error> {
    use jsonwebtoken::Header;
    use jsonwebtoken::encode;

    let claims = Claims {
        sub: account.username.clone(),
        exp: chrono::Utc::now().timestamp() + TOKEN_LIFETIME_SECONDS,
        jti: account.session_id,
    };

    let access_token = encode(&Header::default(), &claims, &jwt_keys.encoding)
        .map_err(Error::internal_server_error)?;

    Ok(Token {
        token_type: "Bearer",
        expires_in: TOKEN_LIFETIME_SECONDS,
        access_token,
    })
}

impl<B> FromRequestParts<B> for CurrentUser
where
    B: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        use jsonwebtoken::Validation;
        use jsonwebtoken::decode;

        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::forbidden("Missing API token"))?;

        let Extension(jwt_keys) = parts
            .extract::<Extension<JwtKeys>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get JWT keys"))?;

        let Extension(account) = parts
            .extract::<Extension<AdminAccount>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get the admin account"))?;

        let validation = Validation::default();

        let token_data = decode::<Claims>(bearer.token(), &jwt_keys.decoding, &validation)
            .map_err(|err| Error::forbidden(format!("Invalid token: {err}")))?;

        let claims = token_data.claims;

        if claims.sub != account.username {
            return Err(Error::forbidden("Unknown user"));
        }

        // tokens of an earlier process are no longer valid
        if claims.jti != account.session_id {
            return Err(Error::forbidden("Token expired"));
        }

        Ok(CurrentUser {
            username: claims.sub,
        })
    }
}
