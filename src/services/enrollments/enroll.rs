use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EnrollmentService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::selections::{entities::Selection, responses::SelectionResponse};
use crate::services::{log_command_failure, principal};
use crate::storage::Storage;

/// 选课
///
/// 存在性、重复选课、人数上限的检查与插入在同一事务内完成。
pub async fn enroll(storage: &dyn Storage, student_id: &str, assignment_id: i64) -> Result<Selection> {
    match storage.enroll(student_id, assignment_id).await {
        Ok(selection) => {
            info!(
                "Student {} enrolled in assignment {} (selection {})",
                student_id, assignment_id, selection.id
            );
            Ok(selection)
        }
        Err(e) => {
            log_command_failure("Enroll", &e);
            Err(e)
        }
    }
}

pub async fn handle_enroll(
    service: &EnrollmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = principal::current_student(storage.as_ref(), request).await?;

    let selection = enroll(storage.as_ref(), &student.student_id, assignment_id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        SelectionResponse::from(selection),
        "Enrolled successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EduAdminError;
    use crate::storage::sea_orm_storage::test_support::*;

    #[tokio::test]
    async fn test_enroll_then_duplicate() {
        let campus = campus(0).await;
        seed_student(&campus.storage, "S001", "CS").await;

        let selection = enroll(&campus.storage, "S001", campus.assignment.id)
            .await
            .unwrap();
        assert_eq!(selection.assignment_id, campus.assignment.id);
        assert_eq!(selection.total_grade(), None);

        let err = enroll(&campus.storage, "S001", campus.assignment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::DuplicateEnrollment(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_enroll_single_seat() {
        let campus = file_campus(1).await;
        let assignment_id = campus.assignment.id;
        for i in 0..6 {
            seed_student(&campus.storage, &format!("S{i:03}"), "CS").await;
        }

        let mut handles = Vec::new();
        for i in 0..6 {
            let storage = campus.storage.clone();
            handles.push(tokio::spawn(async move {
                enroll(&storage, &format!("S{i:03}"), assignment_id).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert_typed_rejection(&e),
            }
        }
        assert_eq!(successes, 1);

        let view = campus
            .storage
            .get_assignment_view(assignment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.current_enrollment, 1);
    }
}
