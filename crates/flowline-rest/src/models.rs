// Wire models for the Flowline REST API
//
// Shapes follow the backend's JSON: camelCase fields, SCREAMING_SNAKE_CASE
// enum values, optional collections omitted when empty.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Ready,
    Claimed,
    Completed,
    Cancelled,
}

impl TaskState {
    /// Wire spelling, as used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Ready => "READY",
            TaskState::Claimed => "CLAIMED",
            TaskState::Completed => "COMPLETED",
            TaskState::Cancelled => "CANCELLED",
        }
    }
}

/// A single element value. The backend stores element values as JSON, so the
/// payload stays schemaless here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskElementValue {
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

/// Severity of a task log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// A log entry attached to a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Set by the backend; leave `None` when appending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub message: String,
    pub level: LogLevel,
}

impl Log {
    /// New log entry ready for appending.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            id: None,
            created_at: None,
            message: message.into(),
            level,
        }
    }
}

/// A task as exposed by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub state: TaskState,
    /// Code of the task definition this task instantiates.
    pub task_definition_code: String,
    pub process_id: Uuid,
    /// Element values keyed by element definition code.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub element_values: HashMap<String, Vec<TaskElementValue>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<Log>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<Uuid>,
}

impl Task {
    /// Minimal task ready for creation.
    pub fn new(id: Uuid, process_id: Uuid, task_definition_code: impl Into<String>) -> Self {
        Self {
            id,
            state: TaskState::Ready,
            task_definition_code: task_definition_code.into(),
            process_id,
            element_values: HashMap::new(),
            logs: Vec::new(),
            owner_id: None,
            tenant_id: None,
        }
    }
}

/// Kinds of authenticated principals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrincipalType {
    User,
    Application,
    System,
}

/// An authenticated principal (human user or application).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub principal_type: PrincipalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Encryption key material served by the key-management endpoint. The value
/// travels base64-encoded on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KmsKey {
    pub id: String,
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
}

/// Paging envelope metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub page: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

/// One page of a task search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub metadata: PageMetadata,
    pub content: Vec<Task>,
}

/// Assign or release a task. One of `owner_id`/`owner_email` selects the new
/// owner; both empty releases the task back to its candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

/// Save (replace) the values of one task element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSaveElementCommand {
    pub element_definition_code: String,
    pub element_values: Vec<TaskElementValue>,
}

/// Remove every value of one task element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDeleteElementCommand {
    pub element_definition_code: String,
}

/// Query options for task search. Unset fields fall back to backend defaults.
#[derive(Debug, Clone, Default)]
pub struct FindTasksOptions {
    pub size: Option<u32>,
    pub page: Option<u32>,
    /// Sort clauses, e.g. `"createdAt,desc"`.
    pub sorts: Vec<String>,
    pub process_ids: Vec<Uuid>,
    pub states: Vec<TaskState>,
}

/// Error body returned by the API on failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub status: u16,
    pub message: String,
}

/// Serde adapter for byte fields that travel base64-encoded.
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_wire_shape_is_camel_case() {
        let task = Task::new(
            Uuid::nil(),
            Uuid::nil(),
            "APPROVE_INVOICE",
        );
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["taskDefinitionCode"], "APPROVE_INVOICE");
        assert_eq!(json["state"], "READY");
        // Empty collections are omitted
        assert!(json.get("elementValues").is_none());
        assert!(json.get("logs").is_none());
    }

    #[test]
    fn test_task_deserializes_with_missing_optionals() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "state": "CLAIMED",
            "taskDefinitionCode": "REVIEW",
            "processId": "00000000-0000-0000-0000-000000000002"
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.state, TaskState::Claimed);
        assert!(task.element_values.is_empty());
        assert!(task.owner_id.is_none());
    }

    #[test]
    fn test_kms_key_value_travels_as_base64() {
        let key = KmsKey {
            id: "key-v1".to_string(),
            value: vec![1, 2, 3, 4],
        };
        let json = serde_json::to_value(&key).unwrap();
        assert_eq!(json["value"], "AQIDBA==");

        let back: KmsKey = serde_json::from_value(json).unwrap();
        assert_eq!(back.value, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_assign_command_omits_empty_owner_fields() {
        let command = TaskAssignCommand::default();
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, "{}");
    }
}
