pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::departments::requests::{
    CreateDepartmentRequest, DepartmentListParams, UpdateDepartmentRequest,
};
use crate::storage::Storage;

use super::impl_storage_access;

pub struct DepartmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl_storage_access!(DepartmentService);

impl DepartmentService {
    pub async fn list_departments(
        &self,
        query: DepartmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_departments(self, query, request).await
    }

    pub async fn create_department(
        &self,
        body: CreateDepartmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_department(self, body, request).await
    }

    pub async fn get_department(
        &self,
        dept_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::get_department(self, dept_id, request).await
    }

    pub async fn update_department(
        &self,
        dept_id: &str,
        body: UpdateDepartmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_department(self, dept_id, body, request).await
    }

    pub async fn delete_department(
        &self,
        dept_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_department(self, dept_id, request).await
    }
}
