use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradingService;
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::selections::responses::{TeacherStudentDetail, TeacherStudentEntry};
use crate::services::principal;
use crate::storage::Storage;

/// 教师全部教学任务中的学生
pub async fn students_for_teacher(
    storage: &dyn Storage,
    teacher_id: &str,
) -> Result<Vec<TeacherStudentEntry>> {
    storage.list_teacher_student_selections(teacher_id, None).await
}

/// 单个学生在该教师教学任务中的选课
///
/// 学生不存在或从未选过该教师的课都视为不存在。
pub async fn student_detail_for_teacher(
    storage: &dyn Storage,
    teacher_id: &str,
    student_id: &str,
) -> Result<TeacherStudentDetail> {
    let student = storage
        .get_student(student_id)
        .await?
        .ok_or_else(|| EduAdminError::not_found(format!("student {student_id}")))?;

    let items = storage
        .list_teacher_student_selections(teacher_id, Some(student_id))
        .await?;
    if items.is_empty() {
        return Err(EduAdminError::not_found(format!(
            "student {student_id} in assignments of teacher {teacher_id}"
        )));
    }

    Ok(TeacherStudentDetail { student, items })
}

pub async fn handle_list_my_students(
    service: &GradingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = principal::current_teacher(storage.as_ref(), request).await?;

    let items = students_for_teacher(storage.as_ref(), &teacher.teacher_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        items,
        "Students retrieved successfully",
    )))
}

pub async fn handle_get_student(
    service: &GradingService,
    student_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = principal::current_teacher(storage.as_ref(), request).await?;

    let detail =
        student_detail_for_teacher(storage.as_ref(), &teacher.teacher_id, student_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Student retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::Semester;
    use crate::models::selections::entities::GradeUpdate;
    use crate::storage::sea_orm_storage::test_support::*;

    #[tokio::test]
    async fn test_students_across_assignments() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_course(storage, "C002", 2.0).await;
        let later = seed_assignment(storage, "C002", "T001", "2025-2026", Semester::First, 0).await;
        seed_teacher(storage, "T002", "CS").await;
        let foreign = seed_assignment(storage, "C002", "T002", "2024-2025", Semester::First, 0).await;
        seed_named_student(storage, "S001", "Zoe", "CS").await;
        seed_named_student(storage, "S002", "Amy", "CS").await;

        storage.enroll("S001", campus.assignment.id).await.unwrap();
        storage.enroll("S002", campus.assignment.id).await.unwrap();
        storage.enroll("S001", later.id).await.unwrap();
        storage.enroll("S002", foreign.id).await.unwrap();

        let items = students_for_teacher(storage, "T001").await.unwrap();
        assert_eq!(items.len(), 3);
        // 最新学年在前，同一教学任务内按姓名
        assert_eq!(items[0].academic_year, "2025-2026");
        assert_eq!(items[0].course_id, "C002");
        assert_eq!(items[1].student_name, "Amy");
        assert_eq!(items[2].student_name, "Zoe");
        assert!(items.iter().all(|e| e.selection.selection.assignment_id != foreign.id));

        assert!(students_for_teacher(storage, "T404").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_student_detail_limited_to_own_assignments() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_teacher(storage, "T002", "CS").await;
        seed_course(storage, "C002", 2.0).await;
        let foreign = seed_assignment(storage, "C002", "T002", "2024-2025", Semester::First, 0).await;
        seed_student(storage, "S001", "CS").await;
        seed_student(storage, "S002", "CS").await;
        let selection = storage.enroll("S001", campus.assignment.id).await.unwrap();
        storage.enroll("S001", foreign.id).await.unwrap();
        storage.enroll("S002", foreign.id).await.unwrap();
        storage
            .record_grades("T001", None, &[GradeUpdate::new(selection.id, Some(80.0), Some(90.0))])
            .await
            .unwrap();

        let detail = student_detail_for_teacher(storage, "T001", "S001").await.unwrap();
        assert_eq!(detail.student.student_id, "S001");
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].course_id, "C001");
        assert_eq!(detail.items[0].selection.total_grade, Some(87.0));

        // 只选了别的教师的课
        let err = student_detail_for_teacher(storage, "T001", "S002").await.unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));

        let err = student_detail_for_teacher(storage, "T001", "S404").await.unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));
    }
}
