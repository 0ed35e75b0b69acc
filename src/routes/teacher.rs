use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::selections::requests::{BatchGradeRequest, RecordGradeRequest};
use crate::models::users::entities::UserRole;
use crate::services::{DashboardService, GradingService};
use crate::utils::{SafeAssignmentIdI64, SafeCode, SafeSelectionIdI64};

static GRADING_SERVICE: Lazy<GradingService> = Lazy::new(GradingService::new_lazy);
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn list_assignments(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.list_my_assignments(&req).await
}

pub async fn roster(req: HttpRequest, assignment_id: SafeAssignmentIdI64) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.get_roster(assignment_id.0, &req).await
}

pub async fn list_students(req: HttpRequest) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.list_my_students(&req).await
}

pub async fn get_student(req: HttpRequest, student_id: SafeCode) -> ActixResult<HttpResponse> {
    GRADING_SERVICE.get_student(&student_id.0, &req).await
}

pub async fn record_grade(
    req: HttpRequest,
    selection_id: SafeSelectionIdI64,
    body: web::Json<RecordGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .record_grade(selection_id.0, body.into_inner(), &req)
        .await
}

pub async fn record_grades(
    req: HttpRequest,
    assignment_id: SafeAssignmentIdI64,
    body: web::Json<BatchGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADING_SERVICE
        .record_grades(assignment_id.0, body.into_inner(), &req)
        .await
}

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.teacher(&req).await
}

// 配置路由
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teacher")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/assignments", web::get().to(list_assignments))
                    .route("/assignments/{assignment_id}/roster", web::get().to(roster))
                    .route(
                        "/assignments/{assignment_id}/grades",
                        web::put().to(record_grades),
                    )
                    .route("/students", web::get().to(list_students))
                    .route("/students/{code}", web::get().to(get_student))
                    .route("/selections/{selection_id}/grade", web::put().to(record_grade))
                    .route("/dashboard", web::get().to(dashboard)),
            ),
    );
}
