//! 选课服务
//!
//! `enroll` / `withdraw` / `list_available` 是与 HTTP 无关的核心操作，
//! 处理程序负责把当前用户解析为学号后调用它们。

pub mod available;
pub mod enroll;
pub mod selections;
pub mod withdraw;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

use super::impl_storage_access;

pub use available::list_available;
pub use enroll::enroll;
pub use withdraw::withdraw;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl_storage_access!(EnrollmentService);

impl EnrollmentService {
    // 可选教学任务
    pub async fn list_available(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        available::handle_list_available(self, request).await
    }

    // 选课
    pub async fn enroll(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::handle_enroll(self, assignment_id, request).await
    }

    // 退选
    pub async fn withdraw(
        &self,
        selection_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        withdraw::handle_withdraw(self, selection_id, request).await
    }

    // 我的选课
    pub async fn list_my_selections(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        selections::handle_list_my_selections(self, request).await
    }

    // 单条选课详情
    pub async fn get_my_selection(
        &self,
        selection_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        selections::handle_get_my_selection(self, selection_id, request).await
    }
}
