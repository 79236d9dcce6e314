//! Swagger-facing account schemas. `controllers::account` returns
//! `models::account` types directly; these mirror them with `ToSchema`
//! derives for the OpenAPI doc.

use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Serialize, ToSchema, ToResponse)]
pub struct LoginResponse {
    pub id: i32,
    pub token: String,
}

#[derive(Serialize, ToSchema, ToResponse)]
pub struct SignupResponse {
    pub id: i32,
    pub email: String,
}

#[derive(Serialize, ToSchema, ToResponse)]
pub struct ValidateResponse {
    pub id: i32,
}
