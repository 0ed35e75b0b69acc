use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::services::log_command_failure;

pub async fn delete_assignment(
    service: &AssignmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 仍有选课记录时存储层返回 StoreConflict
    match storage.delete_assignment(id).await {
        Ok(true) => {
            tracing::info!("Assignment {} deleted", id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Assignment deleted successfully",
            )))
        }
        Ok(false) => Err(EduAdminError::not_found(format!("assignment {id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Delete assignment {id}"), &e);
            Err(e.into())
        }
    }
}
