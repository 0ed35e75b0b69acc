use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::services::log_command_failure;

pub async fn delete_teacher(
    service: &TeacherService,
    teacher_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 仍有教学任务时存储层返回 StoreConflict，系主任引用在同一事务中清除
    match storage.delete_teacher(teacher_id).await {
        Ok(true) => {
            tracing::info!("Teacher {} deleted", teacher_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Teacher deleted successfully")))
        }
        Ok(false) => Err(EduAdminError::not_found(format!("teacher {teacher_id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Delete teacher {teacher_id}"), &e);
            Err(e.into())
        }
    }
}
