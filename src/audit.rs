use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use sea_orm::ActiveValue::NotSet;
use serde_json::Value;

use crate::{entity::audit_logs::ActiveModel as AuditActive, error::AppResult};

pub async fn log_audit<C: ConnectionTrait>(
    conn: &C,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    AuditActive {
        id: NotSet,
        action: Set(action.to_string()),
        resource: Set(resource.map(str::to_string)),
        metadata: Set(metadata),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;

    Ok(())
}

/// Record an audit entry; failures are logged and swallowed.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    action: &str,
    resource: Option<&str>,
    metadata: Value,
) {
    if let Err(err) = log_audit(conn, action, resource, Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
