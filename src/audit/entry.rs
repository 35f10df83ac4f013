//! Audit entry data structures
//!
//! Defines the structure of audit log entries including operation types,
//! entity types, and the entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entity was created (posting committed, user registered)
    Create,
    /// Entity was changed (role change, balance rebuild)
    Update,
    /// A posting was refused and nothing was written
    Reject,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Reject => write!(f, "REJECT"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Income,
    Expense,
    Fund,
    User,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Income => write!(f, "Income"),
            EntityType::Expense => write!(f, "Expense"),
            EntityType::Fund => write!(f, "Fund"),
            EntityType::User => write!(f, "User"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Type of entity affected
    pub entity_type: EntityType,

    /// ID of the affected entity (empty for rejected postings)
    pub entity_id: String,

    /// Human-readable description of the entity (counterparty, username)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// Username of whoever performed the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// JSON representation of the entity before the operation (updates)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// JSON representation of the entity after the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Why a posting was rejected, or what an update changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry for a create operation
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Create,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            actor: None,
            before: None,
            after: serde_json::to_value(entity).ok(),
            detail: None,
        }
    }

    /// Create a new audit entry for an update operation
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        detail: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Update,
            entity_type,
            entity_id: entity_id.into(),
            entity_name,
            actor: None,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            detail,
        }
    }

    /// Create a new audit entry for a posting that was refused
    pub fn reject(
        entity_type: EntityType,
        entity_name: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::Reject,
            entity_type,
            entity_id: String::new(),
            entity_name,
            actor: None,
            before: None,
            after: None,
            detail: Some(reason.into()),
        }
    }

    /// Attribute the entry to a user
    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(Operation::Reject.to_string(), "REJECT");
    }

    #[test]
    fn test_create_entry() {
        let data = json!({"name": "Admissions Office", "amount": 100000});
        let entry = AuditEntry::create(
            EntityType::Income,
            "txn-12345678",
            Some("Admissions Office".to_string()),
            &data,
        )
        .by("alice");

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.entity_type, EntityType::Income);
        assert_eq!(entry.actor.as_deref(), Some("alice"));
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
    }

    #[test]
    fn test_update_entry() {
        let before = json!({"role": "viewer"});
        let after = json!({"role": "accountant"});

        let entry = AuditEntry::update(
            EntityType::User,
            "usr-12345678",
            Some("bob".to_string()),
            &before,
            &after,
            Some("role: viewer -> accountant".to_string()),
        );

        assert_eq!(entry.operation, Operation::Update);
        assert!(entry.before.is_some());
        assert_eq!(entry.detail.as_deref(), Some("role: viewer -> accountant"));
    }

    #[test]
    fn test_reject_entry_has_no_snapshot() {
        let entry = AuditEntry::reject(
            EntityType::Expense,
            Some("Lab Supplier".to_string()),
            "Insufficient funds",
        );

        assert_eq!(entry.operation, Operation::Reject);
        assert!(entry.entity_id.is_empty());
        assert!(entry.after.is_none());

        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"operation\":\"reject\""));
        assert!(!line.contains("\"after\""));
    }
}
