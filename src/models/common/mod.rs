pub mod gender;
pub mod pagination;
pub mod response;

pub use gender::Gender;
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
