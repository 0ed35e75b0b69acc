//! 当前登录用户到学生/教师档案的解析
//!
//! 核心操作只接收学号或工号，由这里完成从 JWT 用户到档案的转换。

use actix_web::HttpRequest;

use crate::errors::{EduAdminError, Result};
use crate::middlewares::RequireJWT;
use crate::models::students::entities::Student;
use crate::models::teachers::entities::Teacher;
use crate::models::users::entities::User;
use crate::storage::Storage;

pub fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| EduAdminError::authentication("Unauthorized access, please login"))
}

/// 当前用户关联的学生档案
pub async fn current_student(storage: &dyn Storage, request: &HttpRequest) -> Result<Student> {
    let user = current_user(request)?;
    storage
        .get_student_by_user_id(user.id)
        .await?
        .ok_or_else(|| {
            EduAdminError::profile_not_linked(format!("user {} has no student profile", user.id))
        })
}

/// 当前用户关联的教师档案
pub async fn current_teacher(storage: &dyn Storage, request: &HttpRequest) -> Result<Teacher> {
    let user = current_user(request)?;
    storage
        .get_teacher_by_user_id(user.id)
        .await?
        .ok_or_else(|| {
            EduAdminError::profile_not_linked(format!("user {} has no teacher profile", user.id))
        })
}
