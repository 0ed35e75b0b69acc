use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::services::log_command_failure;

pub async fn delete_course(
    service: &CourseService,
    course_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_course(course_id).await {
        Ok(true) => {
            tracing::info!("Course {} deleted", course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully")))
        }
        Ok(false) => Err(EduAdminError::not_found(format!("course {course_id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Delete course {course_id}"), &e);
            Err(e.into())
        }
    }
}
