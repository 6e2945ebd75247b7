use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub total: Option<i64>,
    pub next_page_info: Option<String>,
    pub previous_page_info: Option<String>,
}

impl Meta {
    pub fn total(total: usize) -> Self {
        Self {
            total: Some(i64::try_from(total).unwrap_or(i64::MAX)),
            ..Self::empty()
        }
    }

    pub fn cursors(next_page_info: Option<String>, previous_page_info: Option<String>) -> Self {
        Self {
            next_page_info,
            previous_page_info,
            ..Self::empty()
        }
    }

    pub fn empty() -> Self {
        Self {
            total: None,
            next_page_info: None,
            previous_page_info: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
