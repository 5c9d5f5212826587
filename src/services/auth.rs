// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Claims, Session},
};

/// Colaborador de sessão: valida o JWT e devolve a identidade (e-mail).
/// Quem emite o token em produção é o provedor de login; `issue_token` existe
/// para ferramentas internas e testes.
#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    pub fn validate_token(&self, token: &str) -> Result<Session, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(Session::new(token_data.claims.sub, token_data.claims.name))
    }

    pub fn issue_token(&self, email: &str, name: Option<String>) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: email.to_string(),
            name,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::InternalServerError(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_round_trips_to_session() {
        let auth = AuthService::new("segredo".into());
        let token = auth.issue_token("a@x.com", Some("Ana".into())).unwrap();

        let session = auth.validate_token(&token).unwrap();
        assert_eq!(session, Session::new("a@x.com", Some("Ana".into())));
    }

    #[test]
    fn token_from_other_secret_is_unauthorized() {
        let token = AuthService::new("outro".into())
            .issue_token("a@x.com", None)
            .unwrap();

        let err = AuthService::new("segredo".into())
            .validate_token(&token)
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn garbage_is_unauthorized() {
        let auth = AuthService::new("segredo".into());
        assert!(matches!(
            auth.validate_token("nao.e.jwt"),
            Err(AppError::Unauthorized)
        ));
    }
}
