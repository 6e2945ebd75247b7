use serde::Deserialize;
use utoipa::ToSchema;

/// Contact fields an operator may edit directly.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub customer_name: Option<String>,
    pub contact_no: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
}
