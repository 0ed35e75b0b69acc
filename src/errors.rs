//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 选课与成绩相关的业务拒绝也是本枚举的变体，由 HTTP 层统一映射为状态码和 `ErrorCode`。

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use sea_orm::{DbErr, RuntimeErr, SqlErr};
use std::fmt;

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_eduadmin_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum EduAdminError {
            $($variant(String),)*
        }

        impl EduAdminError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EduAdminError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EduAdminError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EduAdminError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EduAdminError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EduAdminError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_eduadmin_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Io("E006", "I/O Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    // 选课与成绩
    DuplicateEnrollment("E101", "Duplicate Enrollment"),
    CapacityExceeded("E102", "Capacity Exceeded"),
    NotOwner("E103", "Not Owner"),
    GradeAlreadyRecorded("E104", "Grade Already Recorded"),
    NotAuthorized("E105", "Not Authorized"),
    InvalidGradeRange("E106", "Invalid Grade Range"),
    StoreConflict("E107", "Store Conflict"),
    ProfileNotLinked("E108", "Profile Not Linked"),
}

impl EduAdminError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 数据库错误归类
    ///
    /// 唯一约束、外键约束冲突以及并发事务的锁冲突归为 `StoreConflict`，
    /// 其余为 `DatabaseOperation`。
    pub fn from_db_err(action: &str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail))
            | Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                EduAdminError::StoreConflict(format!("{action}: {detail}"))
            }
            _ if is_lock_conflict(&err) => {
                EduAdminError::StoreConflict(format!("{action}: {err}"))
            }
            _ => EduAdminError::DatabaseOperation(format!("{action}失败: {err}")),
        }
    }

    /// 是否属于业务拒绝（非基础设施故障）
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            EduAdminError::CacheConnection(_)
                | EduAdminError::CachePluginNotFound(_)
                | EduAdminError::DatabaseConfig(_)
                | EduAdminError::DatabaseConnection(_)
                | EduAdminError::DatabaseOperation(_)
                | EduAdminError::Io(_)
                | EduAdminError::Serialization(_)
        )
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            EduAdminError::NotFound(_) => StatusCode::NOT_FOUND,
            EduAdminError::DuplicateEnrollment(_)
            | EduAdminError::CapacityExceeded(_)
            | EduAdminError::GradeAlreadyRecorded(_)
            | EduAdminError::StoreConflict(_) => StatusCode::CONFLICT,
            EduAdminError::NotOwner(_)
            | EduAdminError::NotAuthorized(_)
            | EduAdminError::ProfileNotLinked(_)
            | EduAdminError::Authorization(_) => StatusCode::FORBIDDEN,
            EduAdminError::Authentication(_) => StatusCode::UNAUTHORIZED,
            EduAdminError::InvalidGradeRange(_)
            | EduAdminError::Validation(_)
            | EduAdminError::DateParse(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 对应的 API 响应码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            EduAdminError::NotFound(_) => ErrorCode::NotFound,
            EduAdminError::DuplicateEnrollment(_) => ErrorCode::DuplicateEnrollment,
            EduAdminError::CapacityExceeded(_) => ErrorCode::CapacityExceeded,
            EduAdminError::NotOwner(_) => ErrorCode::NotOwner,
            EduAdminError::GradeAlreadyRecorded(_) => ErrorCode::GradeAlreadyRecorded,
            EduAdminError::NotAuthorized(_) => ErrorCode::NotAuthorized,
            EduAdminError::InvalidGradeRange(_) => ErrorCode::InvalidGradeRange,
            EduAdminError::StoreConflict(_) => ErrorCode::StoreConflict,
            EduAdminError::ProfileNotLinked(_) => ErrorCode::ProfileNotLinked,
            EduAdminError::Validation(_) | EduAdminError::DateParse(_) => ErrorCode::BadRequest,
            EduAdminError::Authentication(_) => ErrorCode::Unauthorized,
            EduAdminError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 转换为统一的错误响应
    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::build(self.http_status())
            .json(ApiResponse::error_empty(self.api_code(), self.message()))
    }
}

/// 并发事务的锁冲突，重试即可
///
/// SQLite 的 SQLITE_BUSY / SQLITE_LOCKED（含扩展码），SQLSTATE 40001（序列化失败，
/// MySQL 死锁也报此码）和 40P01（PostgreSQL 死锁）。
fn is_lock_conflict(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Exec(e) | DbErr::Query(e) | DbErr::Conn(e) => e,
        _ => return false,
    };
    match runtime {
        RuntimeErr::SqlxError(e) => {
            if let Some(code) = e.as_database_error().and_then(|d| d.code())
                && is_lock_conflict_code(&code)
            {
                return true;
            }
            is_lock_conflict_message(&e.to_string())
        }
        RuntimeErr::Internal(msg) => is_lock_conflict_message(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn is_lock_conflict_code(code: &str) -> bool {
    // SQLSTATE 固定 5 位
    if code.len() == 5 && !code.starts_with('0') {
        return matches!(code, "40001" | "40P01");
    }
    // SQLite 扩展码低 8 位为主错误码：5 BUSY，6 LOCKED
    code.parse::<i32>()
        .map(|sqlite_code| matches!(sqlite_code & 0xff, 5 | 6))
        .unwrap_or(false)
}

fn is_lock_conflict_message(message: &str) -> bool {
    message.contains("database is locked") || message.contains("database table is locked")
}

impl fmt::Display for EduAdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EduAdminError {}

// 处理程序中可直接用 `?` 返回统一格式的错误响应
impl actix_web::ResponseError for EduAdminError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        self.to_response()
    }
}

// 为常见的错误类型实现 From trait
impl From<DbErr> for EduAdminError {
    fn from(err: DbErr) -> Self {
        EduAdminError::from_db_err("数据库操作", err)
    }
}

impl From<std::io::Error> for EduAdminError {
    fn from(err: std::io::Error) -> Self {
        EduAdminError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EduAdminError {
    fn from(err: serde_json::Error) -> Self {
        EduAdminError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EduAdminError {
    fn from(err: chrono::ParseError) -> Self {
        EduAdminError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EduAdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EduAdminError::cache_connection("test").code(), "E001");
        assert_eq!(EduAdminError::database_config("test").code(), "E003");
        assert_eq!(EduAdminError::validation("test").code(), "E007");
        assert_eq!(EduAdminError::duplicate_enrollment("test").code(), "E101");
        assert_eq!(EduAdminError::store_conflict("test").code(), "E107");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EduAdminError::capacity_exceeded("test").error_type(),
            "Capacity Exceeded"
        );
        assert_eq!(
            EduAdminError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EduAdminError::not_owner("selection 7");
        assert_eq!(err.message(), "selection 7");
    }

    #[test]
    fn test_format_simple() {
        let err = EduAdminError::invalid_grade_range("usual=105");
        let formatted = err.format_simple();
        assert!(formatted.contains("Invalid Grade Range"));
        assert!(formatted.contains("usual=105"));
    }

    #[test]
    fn test_http_mapping() {
        assert_eq!(
            EduAdminError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EduAdminError::capacity_exceeded("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EduAdminError::not_authorized("x").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EduAdminError::invalid_grade_range("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EduAdminError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            EduAdminError::grade_already_recorded("x").api_code(),
            ErrorCode::GradeAlreadyRecorded
        );
    }

    #[test]
    fn test_rejection_kinds() {
        assert!(EduAdminError::duplicate_enrollment("x").is_rejection());
        assert!(EduAdminError::store_conflict("x").is_rejection());
        assert!(!EduAdminError::database_operation("x").is_rejection());
    }

    #[test]
    fn test_lock_conflict_codes() {
        assert!(is_lock_conflict_code("5"));
        assert!(is_lock_conflict_code("6"));
        // SQLITE_BUSY_SNAPSHOT
        assert!(is_lock_conflict_code("517"));
        assert!(is_lock_conflict_code("40001"));
        assert!(is_lock_conflict_code("40P01"));
        // 唯一约束
        assert!(!is_lock_conflict_code("2067"));
        assert!(!is_lock_conflict_code("23505"));
    }

    #[test]
    fn test_locked_database_is_store_conflict() {
        let err = EduAdminError::from_db_err(
            "录入成绩",
            DbErr::Exec(RuntimeErr::Internal(
                "error returned from database: (code: 5) database is locked".into(),
            )),
        );
        assert!(matches!(err, EduAdminError::StoreConflict(_)));
        assert!(err.is_rejection());
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_plain_db_error_is_operation_error() {
        let err = EduAdminError::from_db_err("查询", DbErr::Custom("boom".into()));
        assert!(matches!(err, EduAdminError::DatabaseOperation(_)));
        assert!(err.message().contains("boom"));
    }
}
