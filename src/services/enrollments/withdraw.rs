use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::services::{log_command_failure, principal};
use crate::storage::Storage;

/// 退选
///
/// 只能退选本人的、尚未录入任何成绩项的选课记录。
pub async fn withdraw(storage: &dyn Storage, student_id: &str, selection_id: i64) -> Result<()> {
    match storage.withdraw(student_id, selection_id).await {
        Ok(()) => {
            info!("Student {} withdrew selection {}", student_id, selection_id);
            Ok(())
        }
        Err(e) => {
            log_command_failure("Withdraw", &e);
            Err(e)
        }
    }
}

pub async fn handle_withdraw(
    service: &EnrollmentService,
    selection_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = principal::current_student(storage.as_ref(), request).await?;

    withdraw(storage.as_ref(), &student.student_id, selection_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Withdrawn successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EduAdminError;
    use crate::models::selections::entities::GradeUpdate;
    use crate::services::enrollments::enroll;
    use crate::storage::sea_orm_storage::test_support::*;

    #[tokio::test]
    async fn test_withdraw_before_and_after_grading() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;

        let first = enroll(storage, "S001", campus.assignment.id).await.unwrap();
        withdraw(storage, "S001", first.id).await.unwrap();
        assert!(storage.get_selection(first.id).await.unwrap().is_none());

        let second = enroll(storage, "S001", campus.assignment.id).await.unwrap();
        storage
            .record_grades("T001", None, &[GradeUpdate::new(second.id, None, Some(75.0))])
            .await
            .unwrap();
        let err = withdraw(storage, "S001", second.id).await.unwrap_err();
        assert!(matches!(err, EduAdminError::GradeAlreadyRecorded(_)));
    }

    #[tokio::test]
    async fn test_withdraw_someone_elses_selection() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        seed_student(storage, "S002", "CS").await;
        let selection = enroll(storage, "S001", campus.assignment.id).await.unwrap();

        let err = withdraw(storage, "S002", selection.id).await.unwrap_err();
        assert!(matches!(err, EduAdminError::NotOwner(_)));
    }
}
