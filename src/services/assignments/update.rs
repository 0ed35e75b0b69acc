use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::assignments::requests::UpdateAssignmentRequest;
use crate::services::log_command_failure;

pub fn validate_update(update: &UpdateAssignmentRequest) -> Result<()> {
    if update.enrollment_limit.is_some_and(|limit| limit < 0) {
        return Err(EduAdminError::validation(
            "Enrollment limit must not be negative, use 0 for unlimited",
        ));
    }
    Ok(())
}

pub async fn update_assignment(
    service: &AssignmentService,
    id: i64,
    body: UpdateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_update(&body)?;

    // 新上限低于当前选课人数时存储层返回 CapacityExceeded
    match storage.update_assignment(id, body).await {
        Ok(Some(assignment)) => {
            tracing::info!("Assignment {} updated", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignment,
                "Assignment updated successfully",
            )))
        }
        Ok(None) => Err(EduAdminError::not_found(format!("assignment {id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Update assignment {id}"), &e);
            Err(e.into())
        }
    }
}
