use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::teachers::requests::UpdateTeacherRequest;
use crate::services::log_command_failure;
use crate::utils::validate::{validate_code, validate_required};

pub fn validate_update(update: &UpdateTeacherRequest) -> Result<()> {
    if let Some(name) = &update.name {
        validate_required("name", name).map_err(EduAdminError::validation)?;
    }
    if let Some(dept_id) = &update.dept_id {
        validate_code(dept_id).map_err(EduAdminError::validation)?;
    }
    Ok(())
}

pub async fn update_teacher(
    service: &TeacherService,
    teacher_id: &str,
    body: UpdateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_update(&body)?;

    match storage.update_teacher(teacher_id, body).await {
        Ok(Some(teacher)) => {
            tracing::info!("Teacher {} updated", teacher_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                teacher,
                "Teacher updated successfully",
            )))
        }
        Ok(None) => Err(EduAdminError::not_found(format!("teacher {teacher_id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Update teacher {teacher_id}"), &e);
            Err(e.into())
        }
    }
}
