use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::config::AcademicConfig;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::dashboards::responses::StudentDashboard;
use crate::models::students::entities::Student;
use crate::services::{principal, transcripts};
use crate::storage::Storage;

pub async fn student_dashboard(
    storage: &dyn Storage,
    student: Student,
    academic: &AcademicConfig,
) -> Result<StudentDashboard> {
    let entries = storage.list_transcript_entries(&student.student_id).await?;
    let current_term_selections = storage
        .count_student_selections_in_term(
            &student.student_id,
            &academic.current_academic_year,
            academic.current_semester,
        )
        .await?;

    Ok(StudentDashboard {
        student,
        summary: transcripts::summarize(&entries),
        academic_year: academic.current_academic_year.clone(),
        semester: academic.current_semester,
        current_term_selections,
    })
}

pub async fn handle_student_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let student = principal::current_student(storage.as_ref(), request).await?;

    let dashboard =
        student_dashboard(storage.as_ref(), student, &service.get_config().academic).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        dashboard,
        "Dashboard retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::Semester;
    use crate::models::selections::entities::GradeUpdate;
    use crate::storage::sea_orm_storage::test_support::*;

    #[tokio::test]
    async fn test_student_dashboard_counts_current_term() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        let student = seed_student(storage, "S001", "CS").await;
        seed_course(storage, "C002", 2.0).await;
        let next = seed_assignment(storage, "C002", "T001", "2024-2025", Semester::Second, 0).await;

        let a = storage.enroll("S001", campus.assignment.id).await.unwrap();
        storage.enroll("S001", next.id).await.unwrap();
        storage
            .record_grades("T001", None, &[GradeUpdate::new(a.id, None, Some(82.0))])
            .await
            .unwrap();

        let academic = AcademicConfig {
            current_academic_year: "2024-2025".into(),
            current_semester: Semester::Second,
        };
        let dashboard = student_dashboard(storage, student, &academic).await.unwrap();
        assert_eq!(dashboard.current_term_selections, 1);
        assert_eq!(dashboard.summary.total_courses, 2);
        assert_eq!(dashboard.summary.gpa, 3.0);
        assert_eq!(dashboard.summary.earned_credits, 3.0);
    }
}
