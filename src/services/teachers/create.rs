use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::services::log_command_failure;
use crate::services::users::prepare_account;
use crate::utils::validate::{validate_code, validate_required};

pub fn validate_create(req: &CreateTeacherRequest) -> Result<()> {
    validate_code(&req.teacher_id).map_err(EduAdminError::validation)?;
    validate_required("name", &req.name).map_err(EduAdminError::validation)?;
    validate_code(&req.dept_id).map_err(EduAdminError::validation)?;
    Ok(())
}

pub async fn create_teacher(
    service: &TeacherService,
    body: CreateTeacherRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_create(&body)?;

    let account = body.account.clone().map(prepare_account).transpose()?;
    let teacher_id = body.teacher_id.clone();
    match storage
        .create_teacher(CreateTeacherRequest { account, ..body })
        .await
    {
        Ok(teacher) => {
            tracing::info!(
                "Teacher {} created{}",
                teacher.teacher_id,
                if teacher.user_id.is_some() { " with account" } else { "" }
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                teacher,
                "Teacher created successfully",
            )))
        }
        Err(e) => {
            log_command_failure(&format!("Create teacher {teacher_id}"), &e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::teacher_request;

    #[test]
    fn test_validate_create() {
        assert!(validate_create(&teacher_request("T001", "CS")).is_ok());

        let mut req = teacher_request("T 001", "CS");
        assert!(matches!(validate_create(&req), Err(EduAdminError::Validation(_))));

        req = teacher_request("T001", "CS");
        req.name = String::new();
        assert!(matches!(validate_create(&req), Err(EduAdminError::Validation(_))));

        req = teacher_request("T001", "");
        assert!(matches!(validate_create(&req), Err(EduAdminError::Validation(_))));
    }
}
