use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::students::requests::UpdateStudentRequest;
use crate::services::log_command_failure;
use crate::utils::validate::{validate_code, validate_required};

pub fn validate_update(update: &UpdateStudentRequest) -> Result<()> {
    if let Some(name) = &update.name {
        validate_required("name", name).map_err(EduAdminError::validation)?;
    }
    if let Some(dept_id) = &update.dept_id {
        validate_code(dept_id).map_err(EduAdminError::validation)?;
    }
    Ok(())
}

pub async fn update_student(
    service: &StudentService,
    student_id: &str,
    body: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_update(&body)?;

    match storage.update_student(student_id, body).await {
        Ok(Some(student)) => {
            tracing::info!("Student {} updated", student_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                student,
                "Student updated successfully",
            )))
        }
        Ok(None) => Err(EduAdminError::not_found(format!("student {student_id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Update student {student_id}"), &e);
            Err(e.into())
        }
    }
}
