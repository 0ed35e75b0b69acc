//! 教学任务管理（管理员）
//!
//! 列表和详情都附带实时统计的选课人数。

pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::storage::Storage;

use super::impl_storage_access;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl_storage_access!(AssignmentService);

impl AssignmentService {
    pub async fn list_assignments(
        &self,
        query: AssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, query, request).await
    }

    pub async fn create_assignment(
        &self,
        body: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, body, request).await
    }

    pub async fn get_assignment(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_assignment(self, id, request).await
    }

    pub async fn update_assignment(
        &self,
        id: i64,
        body: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, id, body, request).await
    }

    pub async fn delete_assignment(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, id, request).await
    }
}
