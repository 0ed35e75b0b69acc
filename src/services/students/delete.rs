use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::errors::EduAdminError;
use crate::models::ApiResponse;
use crate::services::log_command_failure;

pub async fn delete_student(
    service: &StudentService,
    student_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 选课记录与学生在同一事务中删除，关联的登录账号保留
    match storage.delete_student(student_id).await {
        Ok(true) => {
            tracing::info!("Student {} deleted together with its selections", student_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Student deleted successfully")))
        }
        Ok(false) => Err(EduAdminError::not_found(format!("student {student_id}")).into()),
        Err(e) => {
            log_command_failure(&format!("Delete student {student_id}"), &e);
            Err(e.into())
        }
    }
}
