use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::models::auth::MeResponse;
use crate::models::users::entities::UserRole;
use crate::services::principal;

use super::AuthService;

pub async fn handle_me(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = principal::current_user(request)?;

    let (student, teacher) = match user.role {
        UserRole::Student => (storage.get_student_by_user_id(user.id).await?, None),
        UserRole::Teacher => (None, storage.get_teacher_by_user_id(user.id).await?),
        UserRole::Admin => (None, None),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MeResponse {
            user,
            student,
            teacher,
        },
        "User information retrieved successfully",
    )))
}
