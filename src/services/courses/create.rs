use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::courses::entities::validate_credits;
use crate::models::courses::requests::CreateCourseRequest;
use crate::services::log_command_failure;
use crate::utils::validate::{validate_code, validate_required};

pub fn validate_create(req: &CreateCourseRequest) -> Result<()> {
    validate_code(&req.course_id).map_err(EduAdminError::validation)?;
    validate_required("course_name", &req.course_name).map_err(EduAdminError::validation)?;
    validate_credits(req.credits).map_err(EduAdminError::validation)?;
    if req.hours < 0 {
        return Err(EduAdminError::validation("Hours must not be negative"));
    }
    Ok(())
}

pub async fn create_course(
    service: &CourseService,
    body: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_create(&body)?;

    let course_id = body.course_id.clone();
    match storage.create_course(body).await {
        Ok(course) => {
            tracing::info!("Course {} created", course.course_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                course,
                "Course created successfully",
            )))
        }
        Err(e) => {
            log_command_failure(&format!("Create course {course_id}"), &e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::CourseType;

    fn request(credits: f64, hours: i32) -> CreateCourseRequest {
        CreateCourseRequest {
            course_id: "C001".into(),
            course_name: "Compilers".into(),
            course_type: CourseType::Required,
            hours,
            credits,
            description: None,
        }
    }

    #[test]
    fn test_validate_create() {
        assert!(validate_create(&request(3.0, 48)).is_ok());
        assert!(validate_create(&request(0.0, 0)).is_ok());
        for bad in [request(-1.0, 48), request(f64::NAN, 48), request(3.0, -1)] {
            assert!(matches!(validate_create(&bad), Err(EduAdminError::Validation(_))));
        }
    }
}
