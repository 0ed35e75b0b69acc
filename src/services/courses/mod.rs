pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest};
use crate::storage::Storage;

use super::impl_storage_access;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl_storage_access!(CourseService);

impl CourseService {
    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    pub async fn create_course(
        &self,
        body: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, body, request).await
    }

    pub async fn get_course(&self, course_id: &str, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_course(self, course_id, request).await
    }

    pub async fn update_course(
        &self,
        course_id: &str,
        body: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, course_id, body, request).await
    }

    pub async fn delete_course(
        &self,
        course_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, course_id, request).await
    }
}
