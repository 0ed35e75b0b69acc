use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DepartmentService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::departments::requests::UpdateDepartmentRequest;
use crate::services::log_command_failure;
use crate::utils::validate::validate_required;

pub fn validate_update(update: &UpdateDepartmentRequest) -> Result<()> {
    if let Some(name) = &update.dept_name {
        validate_required("dept_name", name).map_err(EduAdminError::validation)?;
    }
    Ok(())
}

pub async fn update_department(
    service: &DepartmentService,
    dept_id: &str,
    body: UpdateDepartmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_update(&body)?;

    match storage.update_department(dept_id, body).await {
        Ok(Some(department)) => {
            tracing::info!("Department {} updated", dept_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                department,
                "Department updated successfully",
            )))
        }
        Ok(None) => Err(EduAdminError::not_found(format!("department {dept_id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Update department {dept_id}"), &e);
            Err(e.into())
        }
    }
}
