// Task operations
//
// Mutations are modeled as actions under the task resource
// (`/tasks/{id}/~actions/...`), mirroring the backend's route layout.

use std::sync::Arc;

use uuid::Uuid;

use crate::client::ClientCore;
use crate::error::Result;
use crate::models::{
    FindTasksOptions, Log, Task, TaskAssignCommand, TaskDeleteElementCommand, TaskPage,
    TaskSaveElementCommand,
};

/// Operations over the task resource.
pub struct TaskOperations {
    core: Arc<ClientCore>,
}

impl TaskOperations {
    pub(crate) fn new(core: Arc<ClientCore>) -> Self {
        Self { core }
    }

    /// Create a task inside an existing process.
    pub async fn create_task(&self, task: &Task) -> Result<Task> {
        self.core.post_json("/tasks", Some(task)).await
    }

    /// Fetch one task by id.
    pub async fn retrieve_task(&self, id: Uuid) -> Result<Task> {
        self.core.get_json(&format!("/tasks/{id}"), &[]).await
    }

    /// Search tasks. Repeatable filters become repeated query parameters.
    pub async fn find_tasks(&self, options: &FindTasksOptions) -> Result<TaskPage> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(size) = options.size {
            query.push(("size", size.to_string()));
        }
        if let Some(page) = options.page {
            query.push(("page", page.to_string()));
        }
        for sort in &options.sorts {
            query.push(("sort", sort.clone()));
        }
        for process_id in &options.process_ids {
            query.push(("processId", process_id.to_string()));
        }
        for state in &options.states {
            query.push(("state", state.as_str().to_string()));
        }
        self.core.get_json("/tasks", &query).await
    }

    /// Claim the task for the calling principal.
    pub async fn claim_task(&self, id: Uuid) -> Result<Task> {
        self.action(id, "claim", None::<&()>).await
    }

    /// Assign the task to a principal, or release it when the command is
    /// empty.
    pub async fn assign_task(&self, id: Uuid, command: &TaskAssignCommand) -> Result<Task> {
        self.action(id, "assign", Some(command)).await
    }

    /// Save (replace) the values of one task element.
    pub async fn save_task_element(
        &self,
        id: Uuid,
        command: &TaskSaveElementCommand,
    ) -> Result<Task> {
        self.action(id, "save-element", Some(command)).await
    }

    /// Remove every value of one task element.
    pub async fn delete_task_element(
        &self,
        id: Uuid,
        command: &TaskDeleteElementCommand,
    ) -> Result<Task> {
        self.action(id, "delete-element", Some(command)).await
    }

    /// Mark the task completed.
    pub async fn complete_task(&self, id: Uuid) -> Result<Task> {
        self.action(id, "complete", None::<&()>).await
    }

    /// Append a log entry to the task.
    pub async fn append_task_log(&self, id: Uuid, log: &Log) -> Result<Task> {
        self.action(id, "append-log", Some(log)).await
    }

    async fn action<B: serde::Serialize>(
        &self,
        id: Uuid,
        action: &str,
        body: Option<&B>,
    ) -> Result<Task> {
        self.core
            .post_json(&format!("/tasks/{id}/~actions/{action}"), body)
            .await
    }
}
