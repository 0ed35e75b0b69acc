//! 成绩单与学分绩点
//!
//! 成绩单每次请求时由选课记录实时汇总，不做缓存。

pub mod aggregate;
pub mod transcript;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

use super::impl_storage_access;

pub use aggregate::{earned_credits, gpa, grade_point, summarize};
pub use transcript::student_transcript;

pub struct TranscriptService {
    storage: Option<Arc<dyn Storage>>,
}

impl_storage_access!(TranscriptService);

impl TranscriptService {
    // 我的成绩单
    pub async fn my_transcript(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        transcript::handle_my_transcript(self, request).await
    }
}
