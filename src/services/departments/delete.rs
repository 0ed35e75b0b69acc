use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DepartmentService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::services::log_command_failure;

pub async fn delete_department(
    service: &DepartmentService,
    dept_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 仍有教师或学生归属时存储层返回 StoreConflict
    match storage.delete_department(dept_id).await {
        Ok(true) => {
            tracing::info!("Department {} deleted", dept_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Department deleted successfully",
            )))
        }
        Ok(false) => Err(EduAdminError::not_found(format!("department {dept_id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Delete department {dept_id}"), &e);
            Err(e.into())
        }
    }
}
