use actix_web::{HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode};

/// 公开注册已关闭，账号由管理员在创建教师/学生档案时开通
pub async fn handle_register() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::RegisterDisabled,
        "Public registration is disabled, please contact the administrator",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_register_is_disabled() {
        let resp = handle_register().await.unwrap();
        assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], ErrorCode::RegisterDisabled as i32);
    }
}
