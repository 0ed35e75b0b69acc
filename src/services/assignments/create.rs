use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::services::log_command_failure;
use crate::utils::validate::{validate_academic_year, validate_code};

pub fn validate_create(req: &CreateAssignmentRequest) -> Result<()> {
    validate_code(&req.course_id).map_err(EduAdminError::validation)?;
    validate_code(&req.teacher_id).map_err(EduAdminError::validation)?;
    validate_academic_year(&req.academic_year).map_err(EduAdminError::validation)?;
    if req.enrollment_limit < 0 {
        return Err(EduAdminError::validation(
            "Enrollment limit must not be negative, use 0 for unlimited",
        ));
    }
    Ok(())
}

pub async fn create_assignment(
    service: &AssignmentService,
    body: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_create(&body)?;

    let label = format!(
        "{}/{} {} {}",
        body.course_id, body.teacher_id, body.academic_year, body.semester
    );
    // 课程、教师不存在为 NotFound，同一课程教师学期重复为 StoreConflict
    match storage.create_assignment(body).await {
        Ok(assignment) => {
            tracing::info!("Assignment {} ({}) created", assignment.id, label);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => {
            log_command_failure(&format!("Create assignment {label}"), &e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::Semester;

    fn request(academic_year: &str, enrollment_limit: i32) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            course_id: "C001".into(),
            teacher_id: "T001".into(),
            academic_year: academic_year.into(),
            semester: Semester::Second,
            class_time: None,
            location: None,
            exam_time: None,
            enrollment_limit,
        }
    }

    #[test]
    fn test_validate_create() {
        assert!(validate_create(&request("2024-2025", 0)).is_ok());
        assert!(validate_create(&request("2024-2025", 40)).is_ok());
        for bad in [request("2024-2026", 40), request("2024", 40), request("2024-2025", -1)] {
            assert!(matches!(validate_create(&bad), Err(EduAdminError::Validation(_))));
        }
    }
}
