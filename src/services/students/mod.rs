pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::storage::Storage;

use super::impl_storage_access;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl_storage_access!(StudentService);

impl StudentService {
    pub async fn list_students(
        &self,
        query: StudentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, query, request).await
    }

    // 创建学生，可同时开通登录账号
    pub async fn create_student(
        &self,
        body: CreateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, body, request).await
    }

    pub async fn get_student(
        &self,
        student_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::get_student(self, student_id, request).await
    }

    pub async fn update_student(
        &self,
        student_id: &str,
        body: UpdateStudentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, student_id, body, request).await
    }

    // 连同选课记录一起删除
    pub async fn delete_student(
        &self,
        student_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, student_id, request).await
    }
}
