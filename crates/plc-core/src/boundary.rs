//! Request boundary
//!
//! The thin layer an HTTP or RPC front end sits on: it turns an optional
//! session into an authorized caller and an operation result into a status
//! code and JSON body. Internal failures are logged here with their full
//! cause chain; callers only see the generic response.

use crate::error::CoordinatorError;
use plc_model::Session;
use serde::Serialize;

/// Status code and JSON body for a finished operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// JSON body
    pub body: serde_json::Value,
}

/// Require an authenticated session
///
/// # Errors
/// `CoordinatorError::Unauthorized` when there is none.
pub fn authorize(session: Option<Session>) -> Result<Session, CoordinatorError> {
    session.ok_or_else(|| {
        tracing::debug!("request without session rejected");
        CoordinatorError::Unauthorized
    })
}

/// Shape an operation result for the caller
///
/// Success is `200` with the serialized value. Errors use the status and
/// body of [`CoordinatorError::to_response`].
pub fn respond<T: Serialize>(result: Result<T, CoordinatorError>) -> Response {
    match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(body) => Response { status: 200, body },
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                Response {
                    status: 500,
                    body: serde_json::json!({
                        "code": 500,
                        "status": "Internal Server Error",
                        "message": "Internal Server Error",
                    }),
                }
            }
        },
        Err(err) => {
            if let Some(step) = err.step() {
                let cause = std::error::Error::source(&err).map(ToString::to_string);
                tracing::error!(%step, error = %err, ?cause, "operation failed");
            }
            let body = err.to_response();
            Response {
                status: body.code,
                body: serde_json::to_value(&body).unwrap_or(serde_json::Value::Null),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Step;
    use plc_cluster::ClusterError;
    use plc_model::OwnerId;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_session_is_unauthorized() {
        let err = authorize(None).unwrap_err();
        assert_eq!(err.http_status(), 401);

        let session = Session::new(OwnerId::new(), "alice");
        assert_eq!(authorize(Some(session.clone())).unwrap(), session);
    }

    #[test]
    fn success_is_serialized() {
        let response = respond(Ok(vec!["a", "b"]));
        assert_eq!(response.status, 200);
        assert_eq!(response.body, serde_json::json!(["a", "b"]));
    }

    #[test]
    fn errors_carry_code_status_message() {
        let response = respond::<()>(Err(CoordinatorError::project_name_taken()));
        assert_eq!(response.status, 409);
        assert_eq!(
            response.body,
            serde_json::json!({
                "code": 409,
                "status": "Conflict",
                "message": "Project name is already in use",
            })
        );
    }

    #[test]
    fn internal_errors_are_generic() {
        let response = respond::<()>(Err(CoordinatorError::cluster_at(Step::DeleteNamespace)(
            ClusterError::api("etcd timeout"),
        )));
        assert_eq!(response.status, 500);
        assert_eq!(response.body["message"], "Internal Server Error");
    }
}
