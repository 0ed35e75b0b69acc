pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::teachers::requests::{
    CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest,
};
use crate::storage::Storage;

use super::impl_storage_access;

pub struct TeacherService {
    storage: Option<Arc<dyn Storage>>,
}

impl_storage_access!(TeacherService);

impl TeacherService {
    pub async fn list_teachers(
        &self,
        query: TeacherListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_teachers(self, query, request).await
    }

    // 创建教师，可同时开通登录账号
    pub async fn create_teacher(
        &self,
        body: CreateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teacher(self, body, request).await
    }

    pub async fn get_teacher(
        &self,
        teacher_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::get_teacher(self, teacher_id, request).await
    }

    pub async fn update_teacher(
        &self,
        teacher_id: &str,
        body: UpdateTeacherRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_teacher(self, teacher_id, body, request).await
    }

    pub async fn delete_teacher(
        &self,
        teacher_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_teacher(self, teacher_id, request).await
    }
}
