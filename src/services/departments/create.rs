use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DepartmentService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::departments::requests::CreateDepartmentRequest;
use crate::services::log_command_failure;
use crate::utils::validate::{validate_code, validate_required};

pub fn validate_create(req: &CreateDepartmentRequest) -> Result<()> {
    validate_code(&req.dept_id).map_err(EduAdminError::validation)?;
    validate_required("dept_name", &req.dept_name).map_err(EduAdminError::validation)?;
    Ok(())
}

pub async fn create_department(
    service: &DepartmentService,
    body: CreateDepartmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_create(&body)?;

    let dept_id = body.dept_id.clone();
    match storage.create_department(body).await {
        Ok(department) => {
            tracing::info!("Department {} created", department.dept_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                department,
                "Department created successfully",
            )))
        }
        Err(e) => {
            log_command_failure(&format!("Create department {dept_id}"), &e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(dept_id: &str, dept_name: &str) -> CreateDepartmentRequest {
        CreateDepartmentRequest {
            dept_id: dept_id.into(),
            dept_name: dept_name.into(),
            dean_id: None,
            phone: None,
            description: None,
        }
    }

    #[test]
    fn test_validate_create() {
        assert!(validate_create(&request("CS", "Computer Science")).is_ok());
        assert!(matches!(
            validate_create(&request("C S", "Computer Science")),
            Err(EduAdminError::Validation(_))
        ));
        assert!(matches!(
            validate_create(&request("CS", "  ")),
            Err(EduAdminError::Validation(_))
        ));
    }
}
