use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::models::teachers::requests::TeacherListParams;

pub async fn list_teachers(
    service: &TeacherService,
    query: TeacherListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage.list_teachers(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Teachers retrieved successfully",
    )))
}

pub async fn get_teacher(
    service: &TeacherService,
    teacher_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let teacher = storage
        .get_teacher(teacher_id)
        .await?
        .ok_or_else(|| EduAdminError::not_found(format!("teacher {teacher_id}")))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        teacher,
        "Teacher retrieved successfully",
    )))
}
