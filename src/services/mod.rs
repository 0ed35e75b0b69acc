//! 业务逻辑层
//!
//! 每个服务持有可选的存储句柄，未注入时从 actix 应用数据中获取。
//! 选课、成绩、成绩单的核心操作以普通函数形式提供，只接收显式的学号/工号，
//! 不依赖 HTTP 上下文。

/// 为服务生成存储访问方法
macro_rules! impl_storage_access {
    ($service:ident) => {
        impl $service {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub fn with_storage(storage: std::sync::Arc<dyn $crate::storage::Storage>) -> Self {
                Self {
                    storage: Some(storage),
                }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> $crate::errors::Result<std::sync::Arc<dyn $crate::storage::Storage>> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => $crate::services::storage_from_request(request),
                }
            }
        }
    };
}

pub(crate) use impl_storage_access;

pub mod assignments;
pub mod auth;
pub mod courses;
pub mod dashboards;
pub mod departments;
pub mod enrollments;
pub mod grading;
pub mod principal;
pub mod students;
pub mod teachers;
pub mod transcripts;
pub mod users;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

use crate::errors::{EduAdminError, Result};
use crate::storage::Storage;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use dashboards::DashboardService;
pub use departments::DepartmentService;
pub use enrollments::EnrollmentService;
pub use grading::GradingService;
pub use students::StudentService;
pub use teachers::TeacherService;
pub use transcripts::TranscriptService;
pub use users::UserService;

/// 从应用数据中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| EduAdminError::database_connection("Storage not found in app data"))
}

/// 命令失败时的日志：业务拒绝记 debug，基础设施故障记 error
pub(crate) fn log_command_failure(action: &str, err: &EduAdminError) {
    if err.is_rejection() {
        tracing::debug!("{} rejected: {}", action, err);
    } else {
        tracing::error!("{} failed: {}", action, err);
    }
}
