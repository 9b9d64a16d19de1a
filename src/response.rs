use serde::Serialize;
use utoipa::ToSchema;

/// Pagination block appended to list responses.
#[derive(Debug, Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub count: i64,
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

impl ListMeta {
    pub fn new(count: i64, total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            count,
            total,
            current_page: page,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(flatten)]
    pub meta: Option<ListMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            meta: None,
        }
    }

    /// Success without a message, for plain reads.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            meta: None,
        }
    }

    pub fn list(data: T, meta: ListMeta) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            meta: Some(meta),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            meta: None,
        }
    }
}
