// Operation groups, one per API resource

mod kms;
mod principal;
mod task;

pub use kms::KmsOperations;
pub use principal::PrincipalOperations;
pub use task::TaskOperations;
