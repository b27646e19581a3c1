// Task lifecycle activities
//
// Thin facades over the REST client: validate the request, delegate, wrap
// the resource in its response model. Retries, timeouts and heartbeats
// belong to the execution runtime, not here.

use async_trait::async_trait;

use flowline_rest::models::{TaskAssignCommand, TaskDeleteElementCommand, TaskSaveElementCommand};
use flowline_rest::RestClient;

use super::error::ActivityError;
use super::model::*;

/// Task lifecycle activities exposed to workflow code.
#[async_trait]
pub trait TaskActivities: Send + Sync {
    async fn create_task(&self, request: CreateTaskRequest)
        -> Result<CreateTaskResponse, ActivityError>;

    async fn retrieve_task(
        &self,
        request: RetrieveTaskRequest,
    ) -> Result<RetrieveTaskResponse, ActivityError>;

    async fn claim_task(&self, request: ClaimTaskRequest)
        -> Result<ClaimTaskResponse, ActivityError>;

    async fn assign_task(&self, request: AssignTaskRequest)
        -> Result<AssignTaskResponse, ActivityError>;

    async fn save_task_element(
        &self,
        request: SaveTaskElementRequest,
    ) -> Result<SaveTaskElementResponse, ActivityError>;

    async fn delete_task_element(
        &self,
        request: DeleteTaskElementRequest,
    ) -> Result<DeleteTaskElementResponse, ActivityError>;

    async fn complete_task(
        &self,
        request: CompleteTaskRequest,
    ) -> Result<CompleteTaskResponse, ActivityError>;

    async fn append_task_log(
        &self,
        request: AppendTaskLogRequest,
    ) -> Result<AppendTaskLogResponse, ActivityError>;

    async fn retrieve_principal(
        &self,
        request: RetrievePrincipalRequest,
    ) -> Result<RetrievePrincipalResponse, ActivityError>;
}

/// REST-backed implementation of [`TaskActivities`].
pub struct RestTaskActivities {
    client: RestClient,
}

impl RestTaskActivities {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskActivities for RestTaskActivities {
    async fn create_task(
        &self,
        request: CreateTaskRequest,
    ) -> Result<CreateTaskResponse, ActivityError> {
        if request.task.task_definition_code.trim().is_empty() {
            return Err(ActivityError::validation("taskDefinitionCode is required"));
        }
        tracing::info!(task_id = %request.task.id, "Executing create_task");
        let task = self.client.tasks().create_task(&request.task).await?;
        Ok(CreateTaskResponse { task })
    }

    async fn retrieve_task(
        &self,
        request: RetrieveTaskRequest,
    ) -> Result<RetrieveTaskResponse, ActivityError> {
        let task = self.client.tasks().retrieve_task(request.task_id).await?;
        Ok(RetrieveTaskResponse { task })
    }

    async fn claim_task(
        &self,
        request: ClaimTaskRequest,
    ) -> Result<ClaimTaskResponse, ActivityError> {
        tracing::info!(task_id = %request.task_id, "Executing claim_task");
        let task = self.client.tasks().claim_task(request.task_id).await?;
        Ok(ClaimTaskResponse { task })
    }

    async fn assign_task(
        &self,
        request: AssignTaskRequest,
    ) -> Result<AssignTaskResponse, ActivityError> {
        if request.owner_id.is_none() && request.owner_email.is_none() {
            return Err(ActivityError::validation(
                "ownerId or ownerEmail is required",
            ));
        }
        tracing::info!(task_id = %request.task_id, "Executing assign_task");
        let command = TaskAssignCommand {
            owner_id: request.owner_id,
            owner_email: request.owner_email,
        };
        let task = self
            .client
            .tasks()
            .assign_task(request.task_id, &command)
            .await?;
        Ok(AssignTaskResponse { task })
    }

    async fn save_task_element(
        &self,
        request: SaveTaskElementRequest,
    ) -> Result<SaveTaskElementResponse, ActivityError> {
        if request.element_definition_code.trim().is_empty() {
            return Err(ActivityError::validation(
                "elementDefinitionCode is required",
            ));
        }
        if request.element_values.is_empty() {
            return Err(ActivityError::validation("elementValues must not be empty"));
        }
        let command = TaskSaveElementCommand {
            element_definition_code: request.element_definition_code,
            element_values: request.element_values,
        };
        let task = self
            .client
            .tasks()
            .save_task_element(request.task_id, &command)
            .await?;
        Ok(SaveTaskElementResponse { task })
    }

    async fn delete_task_element(
        &self,
        request: DeleteTaskElementRequest,
    ) -> Result<DeleteTaskElementResponse, ActivityError> {
        if request.element_definition_code.trim().is_empty() {
            return Err(ActivityError::validation(
                "elementDefinitionCode is required",
            ));
        }
        let command = TaskDeleteElementCommand {
            element_definition_code: request.element_definition_code,
        };
        let task = self
            .client
            .tasks()
            .delete_task_element(request.task_id, &command)
            .await?;
        Ok(DeleteTaskElementResponse { task })
    }

    async fn complete_task(
        &self,
        request: CompleteTaskRequest,
    ) -> Result<CompleteTaskResponse, ActivityError> {
        tracing::info!(task_id = %request.task_id, "Executing complete_task");
        let task = self.client.tasks().complete_task(request.task_id).await?;
        Ok(CompleteTaskResponse { task })
    }

    async fn append_task_log(
        &self,
        request: AppendTaskLogRequest,
    ) -> Result<AppendTaskLogResponse, ActivityError> {
        if request.log.message.trim().is_empty() {
            return Err(ActivityError::validation("log message is required"));
        }
        let task = self
            .client
            .tasks()
            .append_task_log(request.task_id, &request.log)
            .await?;
        Ok(AppendTaskLogResponse { task })
    }

    async fn retrieve_principal(
        &self,
        request: RetrievePrincipalRequest,
    ) -> Result<RetrievePrincipalResponse, ActivityError> {
        let principal = self
            .client
            .principals()
            .retrieve_principal(request.principal_id)
            .await?;
        Ok(RetrievePrincipalResponse { principal })
    }
}
