use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DashboardService;
use crate::config::AcademicConfig;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::dashboards::responses::TeacherDashboard;
use crate::models::teachers::entities::Teacher;
use crate::services::principal;
use crate::storage::Storage;

pub async fn teacher_dashboard(
    storage: &dyn Storage,
    teacher: Teacher,
    academic: &AcademicConfig,
) -> Result<TeacherDashboard> {
    let assignments = storage.list_teacher_assignments(&teacher.teacher_id).await?;

    let total_students = assignments.iter().map(|a| a.current_enrollment).sum();
    let current_year_assignments = assignments
        .iter()
        .filter(|a| a.assignment.academic_year == academic.current_academic_year)
        .count() as i64;

    Ok(TeacherDashboard {
        teacher,
        total_assignments: assignments.len() as i64,
        total_students,
        academic_year: academic.current_academic_year.clone(),
        current_year_assignments,
    })
}

pub async fn handle_teacher_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let teacher = principal::current_teacher(storage.as_ref(), request).await?;

    let dashboard =
        teacher_dashboard(storage.as_ref(), teacher, &service.get_config().academic).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        dashboard,
        "Dashboard retrieved successfully",
    )))
}
