use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::students::requests::CreateStudentRequest;
use crate::services::log_command_failure;
use crate::services::users::prepare_account;
use crate::utils::validate::{validate_code, validate_required};

pub fn validate_create(req: &CreateStudentRequest) -> Result<()> {
    validate_code(&req.student_id).map_err(EduAdminError::validation)?;
    validate_required("name", &req.name).map_err(EduAdminError::validation)?;
    validate_code(&req.dept_id).map_err(EduAdminError::validation)?;
    Ok(())
}

pub async fn create_student(
    service: &StudentService,
    body: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_create(&body)?;

    let account = body.account.clone().map(prepare_account).transpose()?;
    let student_id = body.student_id.clone();
    match storage
        .create_student(CreateStudentRequest { account, ..body })
        .await
    {
        Ok(student) => {
            tracing::info!("Student {} created", student.student_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                student,
                "Student created successfully",
            )))
        }
        Err(e) => {
            log_command_failure(&format!("Create student {student_id}"), &e);
            Err(e.into())
        }
    }
}
