use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::selections::responses::RosterResponse;
use crate::services::principal;
use crate::storage::Storage;

/// 教学任务花名册，仅任课教师可查看
pub async fn roster_for_teacher(
    storage: &dyn Storage,
    teacher_id: &str,
    assignment_id: i64,
) -> Result<RosterResponse> {
    let assignment = storage
        .get_assignment_view(assignment_id)
        .await?
        .ok_or_else(|| EduAdminError::not_found(format!("assignment {assignment_id}")))?;

    if !assignment.assignment.is_taught_by(teacher_id) {
        return Err(EduAdminError::not_authorized(format!(
            "teacher {teacher_id} does not teach assignment {assignment_id}"
        )));
    }

    let items = storage.list_roster(assignment_id).await?;
    Ok(RosterResponse { assignment, items })
}

pub async fn handle_list_my_assignments(
    service: &GradingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = principal::current_teacher(storage.as_ref(), request).await?;

    let items = storage.list_teacher_assignments(&teacher.teacher_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Assignments retrieved successfully",
    )))
}

pub async fn handle_get_roster(
    service: &GradingService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = principal::current_teacher(storage.as_ref(), request).await?;

    let roster = roster_for_teacher(storage.as_ref(), &teacher.teacher_id, assignment_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        roster,
        "Roster retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::*;

    #[tokio::test]
    async fn test_roster_requires_teaching_teacher() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_teacher(storage, "T002", "CS").await;
        seed_student(storage, "S001", "CS").await;
        storage.enroll("S001", campus.assignment.id).await.unwrap();

        let roster = roster_for_teacher(storage, "T001", campus.assignment.id)
            .await
            .unwrap();
        assert_eq!(roster.items.len(), 1);
        assert_eq!(roster.assignment.current_enrollment, 1);

        let err = roster_for_teacher(storage, "T002", campus.assignment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::NotAuthorized(_)));

        let err = roster_for_teacher(storage, "T001", 9999).await.unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));
    }
}
