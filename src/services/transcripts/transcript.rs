use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TranscriptService, summarize};
use crate::errors::{EduAdminError, Result};
use crate::models::ApiResponse;
use crate::models::transcripts::responses::TranscriptResponse;
use crate::services::principal;
use crate::storage::Storage;

/// 学生成绩单：已出总评的课程明细与汇总
pub async fn student_transcript(storage: &dyn Storage, student_id: &str) -> Result<TranscriptResponse> {
    if storage.get_student(student_id).await?.is_none() {
        return Err(EduAdminError::not_found(format!("student {student_id}")));
    }

    let entries = storage.list_transcript_entries(student_id).await?;
    let summary = summarize(&entries);

    Ok(TranscriptResponse {
        student_id: student_id.to_string(),
        items: entries
            .into_iter()
            .filter(|e| e.total_grade.is_some())
            .collect(),
        summary,
    })
}

pub async fn handle_my_transcript(
    service: &TranscriptService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = principal::current_student(storage.as_ref(), request).await?;

    let transcript = student_transcript(storage.as_ref(), &student.student_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        transcript,
        "Transcript retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::Semester;
    use crate::models::selections::entities::GradeUpdate;
    use crate::storage::sea_orm_storage::test_support::*;

    #[tokio::test]
    async fn test_transcript_from_store() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        seed_course(storage, "C002", 2.0).await;
        seed_course(storage, "C003", 1.0).await;
        let second = seed_assignment(storage, "C002", "T001", "2024-2025", Semester::Second, 0).await;
        let third = seed_assignment(storage, "C003", "T001", "2024-2025", Semester::Summer, 0).await;

        let a = storage.enroll("S001", campus.assignment.id).await.unwrap();
        let b = storage.enroll("S001", second.id).await.unwrap();
        storage.enroll("S001", third.id).await.unwrap();
        storage
            .record_grades(
                "T001",
                None,
                &[
                    GradeUpdate::new(a.id, Some(90.0), Some(95.0)),
                    GradeUpdate::new(b.id, None, Some(59.0)),
                ],
            )
            .await
            .unwrap();

        let transcript = student_transcript(storage, "S001").await.unwrap();
        assert_eq!(transcript.items.len(), 2);
        assert_eq!(transcript.summary.total_courses, 3);
        assert_eq!(transcript.summary.graded_courses, 2);
        assert_eq!(transcript.summary.passed_courses, 1);
        assert_eq!(transcript.summary.earned_credits, 3.0);
        // (4.0 * 3 + 0.0 * 2) / 5
        assert_eq!(transcript.summary.gpa, 2.4);
    }

    #[tokio::test]
    async fn test_empty_transcript() {
        let campus = campus(0).await;
        seed_student(&campus.storage, "S001", "CS").await;
        let transcript = student_transcript(&campus.storage, "S001").await.unwrap();
        assert!(transcript.items.is_empty());
        assert_eq!(transcript.summary.gpa, 0.0);
        assert_eq!(transcript.summary.earned_credits, 0.0);
    }
}
