//! 路径参数安全提取器
//!
//! 在进入处理程序之前完成格式校验，失败时直接返回统一格式的 400 响应。

use actix_web::HttpResponse;

use crate::models::{ApiResponse, ErrorCode};

#[doc(hidden)]
pub fn bad_path_param(code: ErrorCode, message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message.clone()));
    actix_web::error::InternalError::from_response(message, response).into()
}

/// 定义正整数 ID 路径参数提取器
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let parsed = req
                    .match_info()
                    .get($param)
                    .and_then(|raw| raw.parse::<i64>().ok())
                    .filter(|id| *id > 0);
                std::future::ready(match parsed {
                    Some(id) => Ok($name(id)),
                    None => Err($crate::utils::extractor::bad_path_param(
                        $crate::models::ErrorCode::BadRequest,
                        format!("Invalid path parameter: {}", $param),
                    )),
                })
            }
        }
    };
}

/// 定义字符串编号路径参数提取器（系部号、工号、学号、课程号）
#[macro_export]
macro_rules! define_safe_code_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub String);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                let raw = req.match_info().get($param).unwrap_or_default();
                std::future::ready(match $crate::utils::validate::validate_code(raw) {
                    Ok(()) => Ok($name(raw.to_string())),
                    Err(msg) => Err($crate::utils::extractor::bad_path_param(
                        $crate::models::ErrorCode::InvalidCode,
                        format!("{}: {msg}", $param),
                    )),
                })
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeAssignmentIdI64, "assignment_id");
define_safe_i64_extractor!(SafeSelectionIdI64, "selection_id");
define_safe_code_extractor!(SafeCode, "code");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::FromRequest;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_i64_extractor() {
        let req = TestRequest::default()
            .param("selection_id", "42")
            .to_http_request();
        let id = SafeSelectionIdI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);

        let req = TestRequest::default()
            .param("selection_id", "-1")
            .to_http_request();
        assert!(SafeSelectionIdI64::extract(&req).await.is_err());

        let req = TestRequest::default()
            .param("selection_id", "abc")
            .to_http_request();
        assert!(SafeSelectionIdI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_code_extractor() {
        let req = TestRequest::default()
            .param("code", "CS-101")
            .to_http_request();
        assert_eq!(SafeCode::extract(&req).await.unwrap().0, "CS-101");

        let req = TestRequest::default()
            .param("code", "x' OR 1=1")
            .to_http_request();
        assert!(SafeCode::extract(&req).await.is_err());
    }
}
