use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use super::client::{HttpGetter, HttpResponse};
use super::error::AuthorizationError;
use crate::domain::Transfer;

/// Answer the original decision service gave for an approved transfer
pub const DEFAULT_APPROVAL_MESSAGE: &str = "Autorizado";

/// External yes/no decision on a candidate transfer
///
/// `Ok(true)` is the only approval. Implementations must fail closed.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, transfer: &Transfer) -> Result<bool, AuthorizationError>;
}

#[async_trait]
impl<T: Authorizer + ?Sized> Authorizer for Arc<T> {
    async fn authorize(&self, transfer: &Transfer) -> Result<bool, AuthorizationError> {
        (**self).authorize(transfer).await
    }
}

#[derive(Debug, Deserialize)]
struct AuthorizerResponse {
    #[serde(alias = "Message")]
    message: String,
}

/// Authorizer backed by a GET against a decision endpoint
pub struct HttpAuthorizer<G> {
    client: G,
    uri: String,
    approval_message: String,
}

impl<G: HttpGetter> HttpAuthorizer<G> {
    pub fn new(client: G, uri: impl Into<String>) -> Self {
        Self {
            client,
            uri: uri.into(),
            approval_message: DEFAULT_APPROVAL_MESSAGE.to_string(),
        }
    }

    pub fn with_approval_message(mut self, message: impl Into<String>) -> Self {
        self.approval_message = message.into();
        self
    }

    fn decide(&self, response: &HttpResponse) -> Result<bool, AuthorizationError> {
        if response.status >= 500 {
            return Err(AuthorizationError::Unavailable(format!(
                "authorizer answered with status {}",
                response.status
            )));
        }

        if !response.is_success() {
            return Err(AuthorizationError::Denied(format!(
                "authorizer answered with status {}",
                response.status
            )));
        }

        let decoded: AuthorizerResponse = serde_json::from_slice(&response.body)
            .map_err(|e| AuthorizationError::Denied(format!("unreadable decision: {e}")))?;

        if decoded.message == self.approval_message {
            Ok(true)
        } else {
            Err(AuthorizationError::Denied(format!(
                "message '{}'",
                decoded.message
            )))
        }
    }
}

#[async_trait]
impl<G: HttpGetter> Authorizer for HttpAuthorizer<G> {
    async fn authorize(&self, transfer: &Transfer) -> Result<bool, AuthorizationError> {
        let response = self.client.get(&self.uri).await.map_err(|e| {
            error!(transfer_id = %transfer.id(), error = %e, "Authorizer unreachable");
            AuthorizationError::from(e)
        })?;

        match self.decide(&response) {
            Ok(approved) => {
                info!(transfer_id = %transfer.id(), "Transfer authorized");
                Ok(approved)
            }
            Err(e) => {
                info!(
                    transfer_id = %transfer.id(),
                    status = response.status,
                    reason = %e,
                    "Transfer not authorized"
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::error::TransportError;
    use crate::domain::{Amount, Currency, Identifier, Money};
    use chrono::Utc;

    struct FixedGetter(Result<HttpResponse, TransportError>);

    #[async_trait]
    impl HttpGetter for FixedGetter {
        async fn get(&self, _url: &str) -> Result<HttpResponse, TransportError> {
            self.0.clone()
        }
    }

    fn transfer() -> Transfer {
        Transfer::new(
            Identifier::generate(),
            Identifier::generate(),
            Identifier::generate(),
            Money::new(Currency::Ngn, Amount::from_minor_units(100)),
            Utc::now(),
        )
        .unwrap()
    }

    fn authorizer(status: u16, body: &str) -> HttpAuthorizer<FixedGetter> {
        HttpAuthorizer::new(
            FixedGetter(Ok(HttpResponse::new(status, body))),
            "http://authorizer/check",
        )
    }

    #[tokio::test]
    async fn approves_on_expected_message() {
        let gate = authorizer(200, r#"{"message":"Autorizado"}"#);
        assert_eq!(gate.authorize(&transfer()).await, Ok(true));
    }

    #[tokio::test]
    async fn accepts_capitalised_field_name() {
        let gate = authorizer(200, r#"{"Message":"Autorizado"}"#);
        assert_eq!(gate.authorize(&transfer()).await, Ok(true));
    }

    #[tokio::test]
    async fn other_message_is_denied() {
        let gate = authorizer(200, r#"{"message":"Negado"}"#);
        assert_eq!(
            gate.authorize(&transfer()).await,
            Err(AuthorizationError::Denied("message 'Negado'".to_string()))
        );
    }

    #[tokio::test]
    async fn custom_approval_message() {
        let gate = authorizer(200, r#"{"message":"approved"}"#).with_approval_message("approved");
        assert_eq!(gate.authorize(&transfer()).await, Ok(true));

        let gate = authorizer(200, r#"{"message":"Autorizado"}"#).with_approval_message("approved");
        assert!(matches!(
            gate.authorize(&transfer()).await,
            Err(AuthorizationError::Denied(_))
        ));
    }

    #[tokio::test]
    async fn malformed_body_fails_closed() {
        for body in ["", "not json", r#"{"status":"ok"}"#, r#"{"message":42}"#] {
            let gate = authorizer(200, body);
            assert!(
                matches!(gate.authorize(&transfer()).await, Err(AuthorizationError::Denied(_))),
                "body {body:?} should be denied"
            );
        }
    }

    #[tokio::test]
    async fn client_error_status_is_denied() {
        let gate = authorizer(403, r#"{"message":"Autorizado"}"#);
        assert!(matches!(
            gate.authorize(&transfer()).await,
            Err(AuthorizationError::Denied(_))
        ));
    }

    #[tokio::test]
    async fn server_error_status_is_unavailable() {
        let gate = authorizer(500, "");
        assert!(matches!(
            gate.authorize(&transfer()).await,
            Err(AuthorizationError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn transport_failure_is_unavailable() {
        let gate = HttpAuthorizer::new(
            FixedGetter(Err(TransportError::Request("connection refused".to_string()))),
            "http://authorizer/check",
        );
        assert_eq!(
            gate.authorize(&transfer()).await,
            Err(AuthorizationError::Unavailable(
                "Request failed: connection refused".to_string()
            ))
        );
    }
}
