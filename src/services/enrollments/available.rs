use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::EnrollmentService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::assignments::responses::AssignmentView;
use crate::services::principal;
use crate::storage::Storage;

/// 学生当前可选的教学任务
///
/// 排除已选的和已满的。顺序为学年倒序、学期倒序、id 正序，每次调用实时计算。
pub async fn list_available(storage: &dyn Storage, student_id: &str) -> Result<Vec<AssignmentView>> {
    if storage.get_student(student_id).await?.is_none() {
        return Err(EduAdminError::not_found(format!("student {student_id}")));
    }

    let held: HashSet<i64> = storage
        .list_selected_assignment_ids(student_id)
        .await?
        .into_iter()
        .collect();

    Ok(storage
        .list_assignment_views()
        .await?
        .into_iter()
        .filter(|view| !held.contains(&view.assignment.id) && !view.is_full())
        .collect())
}

pub async fn handle_list_available(
    service: &EnrollmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = principal::current_student(storage.as_ref(), request).await?;

    let items = list_available(storage.as_ref(), &student.student_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Available assignments retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::Semester;
    use crate::storage::sea_orm_storage::test_support::*;

    #[tokio::test]
    async fn test_excludes_held_and_full() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        seed_student(storage, "S002", "CS").await;
        seed_course(storage, "C002", 2.0).await;
        seed_course(storage, "C003", 1.0).await;
        let full = seed_assignment(storage, "C002", "T001", "2024-2025", Semester::First, 1).await;
        let summer = seed_assignment(storage, "C003", "T001", "2024-2025", Semester::Summer, 0).await;
        let older = seed_assignment(storage, "C003", "T001", "2023-2024", Semester::Summer, 0).await;

        storage.enroll("S002", full.id).await.unwrap();
        storage.enroll("S001", campus.assignment.id).await.unwrap();

        let available = list_available(storage, "S001").await.unwrap();
        let ids: Vec<i64> = available.iter().map(|v| v.assignment.id).collect();
        assert_eq!(ids, vec![summer.id, older.id]);

        // S002 已选满员的任务，仍能看到 S001 选过的不限人数任务
        let available = list_available(storage, "S002").await.unwrap();
        let ids: Vec<i64> = available.iter().map(|v| v.assignment.id).collect();
        assert_eq!(ids, vec![summer.id, campus.assignment.id, older.id]);
        assert_eq!(available[1].current_enrollment, 1);
    }

    #[tokio::test]
    async fn test_unknown_student() {
        let campus = campus(0).await;
        let err = list_available(&campus.storage, "S404").await.unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));
    }
}
