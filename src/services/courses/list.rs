use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::models::courses::requests::CourseListParams;

pub async fn list_courses(
    service: &CourseService,
    query: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let response = storage.list_courses(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Courses retrieved successfully",
    )))
}

pub async fn get_course(
    service: &CourseService,
    course_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = storage
        .get_course(course_id)
        .await?
        .ok_or_else(|| EduAdminError::not_found(format!("course {course_id}")))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        course,
        "Course retrieved successfully",
    )))
}
