use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::models::students::requests::StudentListParams;

pub async fn list_students(
    service: &StudentService,
    query: StudentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage.list_students(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Students retrieved successfully",
    )))
}

pub async fn get_student(
    service: &StudentService,
    student_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let student = storage
        .get_student(student_id)
        .await?
        .ok_or_else(|| EduAdminError::not_found(format!("student {student_id}")))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        student,
        "Student retrieved successfully",
    )))
}
