use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{IntoParams, Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct NewUserDoc { pub name: String, pub email: String, pub age: i64, pub is_active: Option<bool> }

/// Omitted keys are left unchanged.
#[derive(ToSchema)]
pub struct UserPatchDoc { pub name: Option<String>, pub email: Option<String>, pub age: Option<i64>, pub is_active: Option<bool> }

#[derive(ToSchema)]
pub struct NewItemDoc {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub tax: Option<f64>,
    pub tags: Option<Vec<String>>,
}

/// Omitted keys are left unchanged; `tax: null` clears the tax.
#[derive(ToSchema)]
pub struct ItemPatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub tax: Option<f64>,
    pub tags: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct NewPostDoc { pub title: String, pub content: String, pub author: String, pub published: Option<bool> }

#[derive(ToSchema)]
pub struct PostPatchDoc { pub title: Option<String>, pub content: Option<String>, pub author: Option<String>, pub published: Option<bool> }

#[derive(ToSchema)]
pub struct LoginDoc { pub username: String, pub password: String }

#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Records to skip, default 0.
    pub skip: Option<usize>,
    /// Page size, default 10.
    pub limit: Option<usize>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::users::create,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::users::search,
        crate::routes::items::create,
        crate::routes::items::list,
        crate::routes::items::get,
        crate::routes::items::update,
        crate::routes::items::delete,
        crate::routes::posts::create,
        crate::routes::posts::list,
        crate::routes::posts::get,
        crate::routes::posts::update,
        crate::routes::posts::delete,
        crate::routes::search::search_items,
        crate::routes::stats::stats,
        crate::routes::auth::login,
        crate::routes::auth::protected,
    ),
    components(
        schemas(
            NewUserDoc,
            UserPatchDoc,
            NewItemDoc,
            ItemPatchDoc,
            NewPostDoc,
            PostPatchDoc,
            LoginDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "items"),
        (name = "posts"),
        (name = "search"),
        (name = "stats"),
        (name = "auth")
    )
)]
pub struct ApiDoc;
