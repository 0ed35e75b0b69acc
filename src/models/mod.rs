//! 数据模型定义
//!
//! 每个业务模块按 `entities`（业务实体）、`requests`（请求参数）、`responses`（响应结构）划分。

pub mod assignments;
pub mod auth;
pub mod common;
pub mod courses;
pub mod dashboards;
pub mod departments;
pub mod selections;
pub mod students;
pub mod teachers;
pub mod transcripts;
pub mod users;

pub use common::{ApiResponse, Gender, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 响应码
///
/// - `0`：成功
/// - `1xxx`：通用错误
/// - `2xxx`：认证与账号
/// - `3xxx`：选课与成绩
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    AuthFailed = 2000,
    RegisterDisabled = 2001,
    UserNotFound = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserAlreadyExists = 2006,
    CanNotDeleteCurrentUser = 2007,
    UserInactive = 2008,
    ProfileNotLinked = 2009,

    DuplicateEnrollment = 3001,
    CapacityExceeded = 3002,
    NotOwner = 3003,
    GradeAlreadyRecorded = 3004,
    NotAuthorized = 3005,
    InvalidGradeRange = 3006,
    StoreConflict = 3007,
    InvalidCode = 3008,
}
