use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::courses::entities::validate_credits;
use crate::models::courses::requests::UpdateCourseRequest;
use crate::services::log_command_failure;
use crate::utils::validate::validate_required;

pub fn validate_update(update: &UpdateCourseRequest) -> Result<()> {
    if let Some(name) = &update.course_name {
        validate_required("course_name", name).map_err(EduAdminError::validation)?;
    }
    if let Some(credits) = update.credits {
        validate_credits(credits).map_err(EduAdminError::validation)?;
    }
    if update.hours.is_some_and(|hours| hours < 0) {
        return Err(EduAdminError::validation("Hours must not be negative"));
    }
    Ok(())
}

pub async fn update_course(
    service: &CourseService,
    course_id: &str,
    body: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    validate_update(&body)?;

    match storage.update_course(course_id, body).await {
        Ok(Some(course)) => {
            tracing::info!("Course {} updated", course_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                course,
                "Course updated successfully",
            )))
        }
        Ok(None) => Err(EduAdminError::not_found(format!("course {course_id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Update course {course_id}"), &e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_update() {
        assert!(validate_update(&UpdateCourseRequest::default()).is_ok());

        let update = UpdateCourseRequest {
            credits: Some(-0.5),
            ..Default::default()
        };
        assert!(matches!(validate_update(&update), Err(EduAdminError::Validation(_))));
    }
}
