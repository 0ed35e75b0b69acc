//! 学生与教师仪表盘
//!
//! "本学期"取自配置项 `academic.current_academic_year` / `academic.current_semester`。

pub mod student;
pub mod teacher;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::Storage;

use super::impl_storage_access;

pub use student::student_dashboard;
pub use teacher::teacher_dashboard;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl_storage_access!(DashboardService);

impl DashboardService {
    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn student(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        student::handle_student_dashboard(self, request).await
    }

    pub async fn teacher(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        teacher::handle_teacher_dashboard(self, request).await
    }
}
