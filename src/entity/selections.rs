use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A set of variant choices (colors or sizes) stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
#[serde(transparent)]
pub struct Selections(pub Vec<String>);

impl From<Vec<String>> for Selections {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}
