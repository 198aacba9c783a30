//! Bearer token authentication for HTTP handlers.
//!
//! Handlers that need a caller identity take a [`BearerIdentity`] parameter;
//! extraction reads the `Authorization` header and resolves the token through
//! the [`TokenVerifier`] port, so handlers never see raw credentials.
//!
//! [`TokenVerifier`]: crate::domain::ports::TokenVerifier

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::TokenVerifierError;
use crate::domain::{AuthenticatedUser, Error};
use crate::inbound::http::state::HttpState;

/// Authenticated caller resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct BearerIdentity(AuthenticatedUser);

impl BearerIdentity {
    /// The resolved caller.
    pub fn user(&self) -> &AuthenticatedUser {
        &self.0
    }

    /// Consume the extractor, yielding the caller.
    pub fn into_user(self) -> AuthenticatedUser {
        self.0
    }
}

fn bearer_token(header_value: Option<&str>) -> Result<&str, Error> {
    let value = header_value.ok_or_else(|| Error::unauthorized("authentication required"))?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("invalid bearer token"))?;
    Ok(token)
}

fn map_verifier_error(error: TokenVerifierError) -> Error {
    match error {
        TokenVerifierError::InvalidToken => Error::unauthorized("invalid bearer token"),
        TokenVerifierError::Unavailable { message } => {
            warn!(message, "token verifier unavailable");
            Error::service_unavailable("authentication backend unavailable")
        }
    }
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let header_value = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("http state not configured"))?;
            let token = bearer_token(header_value.as_deref())?.to_owned();
            state
                .verifier
                .verify(&token)
                .await
                .map(BearerIdentity)
                .map_err(map_verifier_error)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, web};
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        FixtureMessagesCommand, FixtureMessagesQuery, FixtureTokenVerifier,
    };

    fn fixture_state() -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(FixtureMessagesCommand),
            Arc::new(FixtureMessagesQuery),
            Arc::new(FixtureTokenVerifier::with_default_user()),
        ))
    }

    #[rstest]
    #[case(None, "authentication required")]
    #[case(Some("Token abc"), "invalid bearer token")]
    #[case(Some("Bearer "), "invalid bearer token")]
    fn malformed_headers_are_unauthorized(
        #[case] header_value: Option<&str>,
        #[case] expected: &str,
    ) {
        let error = bearer_token(header_value).expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), expected);
    }

    #[rstest]
    fn verifier_outage_maps_to_service_unavailable() {
        let error = map_verifier_error(TokenVerifierError::unavailable("identity service down"));
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[actix_web::test]
    async fn known_token_resolves_the_caller() {
        let app = actix_web::test::init_service(App::new().app_data(fixture_state()).route(
            "/whoami",
            web::get().to(|identity: BearerIdentity| async move {
                HttpResponse::Ok().body(identity.user().user_id.to_string())
            }),
        ))
        .await;

        let request = actix_web::test::TestRequest::get()
            .uri("/whoami")
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", FixtureTokenVerifier::DEFAULT_TOKEN),
            ))
            .to_request();
        let response = actix_web::test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unknown_token_is_rejected() {
        let app = actix_web::test::init_service(App::new().app_data(fixture_state()).route(
            "/whoami",
            web::get().to(|identity: BearerIdentity| async move {
                HttpResponse::Ok().body(identity.user().user_id.to_string())
            }),
        ))
        .await;

        let request = actix_web::test::TestRequest::get()
            .uri("/whoami")
            .insert_header((header::AUTHORIZATION, "Bearer wrong-token"))
            .to_request();
        let response = actix_web::test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
