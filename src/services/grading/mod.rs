//! 成绩录入服务
//!
//! 取值范围在进入存储层之前全部校验完，批量录入整体成功或整体失败。

pub mod record;
pub mod roster;
pub mod students;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::selections::requests::{BatchGradeRequest, RecordGradeRequest};
use crate::storage::Storage;

use super::impl_storage_access;

pub use record::{record_grade, record_grades};

pub struct GradingService {
    storage: Option<Arc<dyn Storage>>,
}

impl_storage_access!(GradingService);

impl GradingService {
    // 我的教学任务
    pub async fn list_my_assignments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        roster::handle_list_my_assignments(self, request).await
    }

    // 花名册
    pub async fn get_roster(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        roster::handle_get_roster(self, assignment_id, request).await
    }

    // 我的学生
    pub async fn list_my_students(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        students::handle_list_my_students(self, request).await
    }

    // 学生详情
    pub async fn get_student(
        &self,
        student_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::handle_get_student(self, student_id, request).await
    }

    // 单条录入
    pub async fn record_grade(
        &self,
        selection_id: i64,
        body: RecordGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::handle_record_grade(self, selection_id, body, request).await
    }

    // 按教学任务批量录入
    pub async fn record_grades(
        &self,
        assignment_id: i64,
        body: BatchGradeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::handle_record_grades(self, assignment_id, body, request).await
    }
}
