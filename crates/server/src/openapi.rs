use utoipa::openapi::path::{OperationBuilder, PathItem, PathItemType};
use utoipa::openapi::response::Response;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `YYYY-MM-DD`
    pub birthday: String,
}

#[derive(ToSchema)]
pub struct UserUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(ToSchema)]
pub struct MessageResponse { pub message: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::users::list,
        crate::routes::users::show,
        crate::routes::users::signup,
        crate::routes::users::update,
        crate::routes::users::delete,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            SignupRequest,
            UserUpdateRequest,
            MessageResponse,
            crate::routes::auth::LoginOutput,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users")
    )
)]
pub struct ApiDoc;

fn operation(relation: &str, summary: String, responses: &[(&str, &str)]) -> utoipa::openapi::path::Operation {
    let mut op = OperationBuilder::new().tag(relation).summary(Some(summary));
    for (status, description) in responses {
        op = op.response(*status, Response::new(*description));
    }
    op.build()
}

fn add(doc: &mut utoipa::openapi::OpenApi, path: &str, method: PathItemType, op: utoipa::openapi::path::Operation) {
    doc.paths
        .paths
        .entry(path.to_string())
        .or_insert_with(|| PathItem::new(method.clone(), op.clone()))
        .operations
        .insert(method, op);
}

/// Static document plus the generated CRUD paths of every mounted relation.
pub fn document(relations: &[&str]) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    for relation in relations {
        let collection = format!("/api/{relation}");
        let item = format!("/api/{relation}/{{id}}");
        add(&mut doc, &collection, PathItemType::Get, operation(relation, format!("List {relation}"), &[("200", "Owner's resources"), ("401", "Unauthenticated")]));
        add(&mut doc, &collection, PathItemType::Post, operation(relation, format!("Create {relation}"), &[("201", "Created"), ("400", "Invalid input"), ("401", "Unauthenticated")]));
        add(&mut doc, &item, PathItemType::Get, operation(relation, format!("Show {relation}"), &[("200", "Resource"), ("404", "Not found")]));
        add(&mut doc, &item, PathItemType::Put, operation(relation, format!("Update {relation}"), &[("200", "Updated"), ("400", "Invalid input")]));
        add(&mut doc, &item, PathItemType::Patch, operation(relation, format!("Update {relation}"), &[("200", "Updated"), ("400", "Invalid input")]));
        add(&mut doc, &item, PathItemType::Delete, operation(relation, format!("Delete {relation}"), &[("200", "Deleted"), ("404", "Not found")]));
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_paths_are_documented() {
        let doc = document(&["notes"]);
        let item = doc.paths.paths.get("/api/notes/{id}").expect("item path");
        assert_eq!(item.operations.len(), 4);
        assert!(doc.paths.paths.contains_key("/api/notes"));
        assert!(doc.paths.paths.contains_key("/api/users"));
        assert!(doc.paths.paths.contains_key("/api/login"));
    }
}
