// Typed client for the Flowline REST API
//
// One client is built at startup and cloned wherever a handle is needed;
// operation groups (tasks, principals, kms) hang off it. Requests carry HTTP
// basic auth with the worker's application id and token.

pub mod client;
pub mod error;
pub mod models;
pub mod operations;

pub use client::{RestClient, RestClientBuilder, API_VERSION};
pub use error::{Result, RestError};
pub use operations::{KmsOperations, PrincipalOperations, TaskOperations};
