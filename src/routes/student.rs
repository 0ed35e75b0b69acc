use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::{DashboardService, EnrollmentService, TranscriptService};
use crate::utils::{SafeAssignmentIdI64, SafeSelectionIdI64};

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);
static TRANSCRIPT_SERVICE: Lazy<TranscriptService> = Lazy::new(TranscriptService::new_lazy);
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn list_available(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.list_available(&req).await
}

pub async fn enroll(req: HttpRequest, assignment_id: SafeAssignmentIdI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.enroll(assignment_id.0, &req).await
}

pub async fn list_selections(req: HttpRequest) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.list_my_selections(&req).await
}

pub async fn get_selection(
    req: HttpRequest,
    selection_id: SafeSelectionIdI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_my_selection(selection_id.0, &req).await
}

pub async fn withdraw(req: HttpRequest, selection_id: SafeSelectionIdI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.withdraw(selection_id.0, &req).await
}

pub async fn transcript(req: HttpRequest) -> ActixResult<HttpResponse> {
    TRANSCRIPT_SERVICE.my_transcript(&req).await
}

pub async fn dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.student(&req).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/student")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
                    .route("/assignments/available", web::get().to(list_available))
                    .route("/assignments/{assignment_id}/enroll", web::post().to(enroll))
                    .route("/selections", web::get().to(list_selections))
                    .route("/selections/{selection_id}", web::get().to(get_selection))
                    .route("/selections/{selection_id}", web::delete().to(withdraw))
                    .route("/transcript", web::get().to(transcript))
                    .route("/dashboard", web::get().to(dashboard)),
            ),
    );
}
