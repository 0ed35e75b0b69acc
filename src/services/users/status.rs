use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::{EduAdminError, Result};
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 启用/停用互换，返回 `None` 表示用户不存在
pub async fn toggle_user_status(
    storage: &dyn Storage,
    operator_id: i64,
    user_id: i64,
) -> Result<Option<User>> {
    if operator_id == user_id {
        return Err(EduAdminError::validation("Cannot change the status of current user"));
    }

    let Some(user) = storage.get_user_by_id(user_id).await? else {
        return Ok(None);
    };

    let updated = storage
        .update_user_status(user_id, user.status.toggled())
        .await?;
    if let Some(updated) = &updated {
        tracing::info!("User {} status changed to {:?}", updated.username, updated.status);
    }
    Ok(updated)
}

pub async fn toggle_status(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let operator_id = RequireJWT::extract_user_id(request)
        .ok_or_else(|| EduAdminError::authentication("Unauthorized access, please login"))?;

    if operator_id == user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot change the status of current user",
        )));
    }

    match toggle_user_status(storage.as_ref(), operator_id, user_id).await? {
        Some(user) => {
            // 停用立即生效，不等缓存过期
            RequireJWT::evict_cached_user(request, user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                user,
                "User status updated successfully",
            )))
        }
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
    }
}
