//! Generic HTTP adapter over [`CrudService`]: one router per relation.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use configs::StatusPolicy;
use serde_json::Value;
use tracing::warn;

use service::crud::{CrudPayload, CrudService, FieldValue, OwnerId, RelationDescriptor, Resource};
use service::errors::{ErrorKind, ServiceError};

use crate::errors::ApiError;

/// The five endpoints every relation gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudEndpoint {
    List,
    Create,
    Show,
    Update,
    Delete,
}

impl CrudEndpoint {
    pub fn success_status(self) -> StatusCode {
        match self {
            CrudEndpoint::Create => StatusCode::CREATED,
            _ => StatusCode::OK,
        }
    }

    /// Status for a failed call under `policy`.
    pub fn failure_status(self, policy: StatusPolicy, kind: ErrorKind) -> StatusCode {
        match policy {
            StatusPolicy::PerEndpoint => match self {
                CrudEndpoint::Show | CrudEndpoint::Delete => StatusCode::NOT_FOUND,
                CrudEndpoint::List | CrudEndpoint::Create | CrudEndpoint::Update => StatusCode::BAD_REQUEST,
            },
            StatusPolicy::PerErrorKind => match kind {
                ErrorKind::Validation | ErrorKind::Malformed => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Db => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// Binds one relation's service and descriptor to HTTP.
pub struct ResourceController<R: Resource> {
    service: CrudService<R>,
    descriptor: RelationDescriptor<R>,
    policy: StatusPolicy,
}

fn parse_body(body: &Bytes) -> Result<Value, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| ServiceError::Malformed(e.to_string()))
}

impl<R: Resource> ResourceController<R> {
    pub fn new(service: CrudService<R>, descriptor: RelationDescriptor<R>, policy: StatusPolicy) -> Self {
        Self { service, descriptor, policy }
    }

    fn respond<T: serde::Serialize>(&self, endpoint: CrudEndpoint, result: Result<CrudPayload<T>, ServiceError>) -> Response {
        match result {
            Ok(payload) => (endpoint.success_status(), Json(payload)).into_response(),
            Err(e) => self.fail(endpoint, e).into_response(),
        }
    }

    fn fail(&self, endpoint: CrudEndpoint, err: ServiceError) -> ApiError {
        let status = endpoint.failure_status(self.policy, err.kind());
        warn!(relation = R::RELATION, ?endpoint, kind = ?err.kind(), %status, error = %err, "crud request failed");
        ApiError::new(status, err.to_string())
    }

    pub async fn list(&self, owner: OwnerId) -> Response {
        self.respond(CrudEndpoint::List, self.service.index(owner).await)
    }

    pub async fn create(&self, owner: OwnerId, body: Bytes) -> Response {
        let result = match parse_body(&body) {
            Ok(input) => {
                self.service
                    .store(owner, &input, self.descriptor.create_rules(), self.descriptor.unique_field())
                    .await
            }
            Err(e) => Err(e),
        };
        self.respond(CrudEndpoint::Create, result)
    }

    pub async fn show(&self, owner: OwnerId, id: &str) -> Response {
        let result = self
            .service
            .show(owner, FieldValue::from_path(id), R::ID_FIELD)
            .await
            .map(|resource| CrudPayload::keyed(R::RELATION, resource));
        self.respond(CrudEndpoint::Show, result)
    }

    pub async fn update(&self, owner: OwnerId, id: &str, body: Bytes) -> Response {
        let result = match parse_body(&body) {
            Ok(input) => {
                self.service
                    .update(owner, FieldValue::from_path(id), &input, self.descriptor.update_rules(), R::ID_FIELD)
                    .await
            }
            Err(e) => Err(e),
        };
        self.respond(CrudEndpoint::Update, result)
    }

    pub async fn destroy(&self, owner: OwnerId, id: &str) -> Response {
        let result = self.service.destroy(owner, FieldValue::from_path(id), R::ID_FIELD).await;
        self.respond(CrudEndpoint::Delete, result)
    }
}

type Ctl<R> = Extension<Arc<ResourceController<R>>>;

async fn index<R: Resource>(Extension(ctl): Ctl<R>, Extension(owner): Extension<OwnerId>) -> Response {
    ctl.list(owner).await
}

async fn store<R: Resource>(Extension(ctl): Ctl<R>, Extension(owner): Extension<OwnerId>, body: Bytes) -> Response {
    ctl.create(owner, body).await
}

async fn show<R: Resource>(Extension(ctl): Ctl<R>, Extension(owner): Extension<OwnerId>, Path(id): Path<String>) -> Response {
    ctl.show(owner, &id).await
}

async fn update<R: Resource>(
    Extension(ctl): Ctl<R>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    ctl.update(owner, &id, body).await
}

async fn destroy<R: Resource>(Extension(ctl): Ctl<R>, Extension(owner): Extension<OwnerId>, Path(id): Path<String>) -> Response {
    ctl.destroy(owner, &id).await
}

/// `GET|POST /api/<relation>` and `GET|PUT|PATCH|DELETE /api/<relation>/:id`.
///
/// Handlers expect an [`OwnerId`] extension, so the router must sit behind the auth layer.
pub fn resource_routes<R, S>(controller: Arc<ResourceController<R>>) -> Router<S>
where
    R: Resource,
    S: Clone + Send + Sync + 'static,
{
    let collection = format!("/api/{}", R::RELATION);
    let item = format!("/api/{}/:id", R::RELATION);
    Router::new()
        .route(&collection, get(index::<R>).post(store::<R>))
        .route(&item, get(show::<R>).put(update::<R>).patch(update::<R>).delete(destroy::<R>))
        .layer(Extension(controller))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_endpoint_policy_ignores_error_kind() {
        let p = StatusPolicy::PerEndpoint;
        assert_eq!(CrudEndpoint::Create.failure_status(p, ErrorKind::NotFound), StatusCode::BAD_REQUEST);
        assert_eq!(CrudEndpoint::Update.failure_status(p, ErrorKind::NotFound), StatusCode::BAD_REQUEST);
        assert_eq!(CrudEndpoint::List.failure_status(p, ErrorKind::Db), StatusCode::BAD_REQUEST);
        assert_eq!(CrudEndpoint::Show.failure_status(p, ErrorKind::Validation), StatusCode::NOT_FOUND);
        assert_eq!(CrudEndpoint::Delete.failure_status(p, ErrorKind::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn per_error_kind_policy_ignores_endpoint() {
        let p = StatusPolicy::PerErrorKind;
        assert_eq!(CrudEndpoint::Update.failure_status(p, ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(CrudEndpoint::Create.failure_status(p, ErrorKind::Conflict), StatusCode::CONFLICT);
        assert_eq!(CrudEndpoint::Create.failure_status(p, ErrorKind::Malformed), StatusCode::BAD_REQUEST);
        assert_eq!(CrudEndpoint::Show.failure_status(p, ErrorKind::Db), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn blank_body_is_empty_input() {
        assert_eq!(parse_body(&Bytes::from_static(b"  ")).unwrap(), Value::Null);
        assert!(matches!(parse_body(&Bytes::from_static(b"{oops")), Err(ServiceError::Malformed(_))));
    }
}
