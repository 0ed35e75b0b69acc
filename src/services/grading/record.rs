use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradingService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::selections::{
    entities::{GradeUpdate, Selection},
    requests::{BatchGradeRequest, RecordGradeRequest},
    responses::SelectionResponse,
};
use crate::services::{log_command_failure, principal};
use crate::storage::Storage;

async fn apply(
    storage: &dyn Storage,
    teacher_id: &str,
    scope: Option<i64>,
    updates: &[GradeUpdate],
) -> Result<Vec<Selection>> {
    if updates.is_empty() {
        return Err(EduAdminError::validation("no grades supplied"));
    }
    for update in updates {
        update.validate()?;
    }

    match storage.record_grades(teacher_id, scope, updates).await {
        Ok(recorded) => {
            info!(
                "Teacher {} recorded grades for {} selection(s)",
                teacher_id,
                recorded.len()
            );
            Ok(recorded)
        }
        Err(e) => {
            log_command_failure("Record grades", &e);
            Err(e)
        }
    }
}

/// 录入单条选课记录的成绩，`None` 表示该项保持不变
pub async fn record_grade(
    storage: &dyn Storage,
    teacher_id: &str,
    selection_id: i64,
    usual_grade: Option<f64>,
    final_grade: Option<f64>,
) -> Result<Selection> {
    let update = GradeUpdate::new(selection_id, usual_grade, final_grade);
    apply(storage, teacher_id, None, &[update])
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| EduAdminError::not_found(format!("selection {selection_id}")))
}

/// 批量录入，整体成功或整体失败
pub async fn record_grades(
    storage: &dyn Storage,
    teacher_id: &str,
    updates: &[GradeUpdate],
) -> Result<Vec<Selection>> {
    apply(storage, teacher_id, None, updates).await
}

/// 批量录入，且每条选课记录都必须属于指定教学任务
pub async fn record_assignment_grades(
    storage: &dyn Storage,
    teacher_id: &str,
    assignment_id: i64,
    updates: &[GradeUpdate],
) -> Result<Vec<Selection>> {
    apply(storage, teacher_id, Some(assignment_id), updates).await
}

pub async fn handle_record_grade(
    service: &GradingService,
    selection_id: i64,
    body: RecordGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = principal::current_teacher(storage.as_ref(), request).await?;

    let selection = record_grade(
        storage.as_ref(),
        &teacher.teacher_id,
        selection_id,
        body.usual_grade,
        body.final_grade,
    )
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SelectionResponse::from(selection),
        "Grade recorded successfully",
    )))
}

pub async fn handle_record_grades(
    service: &GradingService,
    assignment_id: i64,
    body: BatchGradeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = principal::current_teacher(storage.as_ref(), request).await?;

    let recorded = record_assignment_grades(
        storage.as_ref(),
        &teacher.teacher_id,
        assignment_id,
        &body.grades,
    )
    .await?;

    let items: Vec<SelectionResponse> = recorded.into_iter().map(SelectionResponse::from).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Grades recorded successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::*;

    #[tokio::test]
    async fn test_record_grade_derives_total() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        let selection = storage.enroll("S001", campus.assignment.id).await.unwrap();

        let graded = record_grade(storage, "T001", selection.id, Some(80.0), Some(90.0))
            .await
            .unwrap();
        assert_eq!(graded.total_grade(), Some(87.0));
        assert!(graded.grade_time.is_some());
    }

    #[tokio::test]
    async fn test_out_of_range_leaves_store_unchanged() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        let selection = storage.enroll("S001", campus.assignment.id).await.unwrap();

        let err = record_grade(storage, "T001", selection.id, Some(105.0), None)
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::InvalidGradeRange(_)));

        let stored = storage.get_selection(selection.id).await.unwrap().unwrap();
        assert_eq!(stored.usual_grade, None);
        assert_eq!(stored.grade_time, None);
    }

    #[tokio::test]
    async fn test_batch_validates_everything_first() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        seed_student(storage, "S002", "CS").await;
        let a = storage.enroll("S001", campus.assignment.id).await.unwrap();
        let b = storage.enroll("S002", campus.assignment.id).await.unwrap();

        let err = record_assignment_grades(
            storage,
            "T001",
            campus.assignment.id,
            &[
                GradeUpdate::new(a.id, Some(90.0), Some(90.0)),
                GradeUpdate::new(b.id, None, Some(f64::NAN)),
            ],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EduAdminError::InvalidGradeRange(_)));
        assert_eq!(storage.get_selection(a.id).await.unwrap().unwrap().final_grade, None);

        let recorded = record_assignment_grades(
            storage,
            "T001",
            campus.assignment.id,
            &[
                GradeUpdate::new(a.id, Some(90.0), Some(90.0)),
                GradeUpdate::new(b.id, None, Some(59.0)),
            ],
        )
        .await
        .unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].total_grade(), Some(59.0));
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let campus = campus(0).await;
        let err = record_grades(&campus.storage, "T001", &[]).await.unwrap_err();
        assert!(matches!(err, EduAdminError::Validation(_)));
    }
}
