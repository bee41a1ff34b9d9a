use async_trait::async_trait;

use crate::errors::AppError;

/// Shared CRUD surface every entity store implements. Per-entity traits
/// extend this only where a genuinely custom query exists (by-name,
/// by-file-id, reference clearing), instead of each store re-declaring
/// the same four methods.
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Send;
    type Id: Send + Sync;
    type Insert: Send + Sync;

    async fn get(&self, id: &Self::Id) -> Result<Option<Self::Entity>, AppError>;

    async fn list(&self) -> Result<Vec<Self::Entity>, AppError>;

    async fn create(&self, insert: &Self::Insert) -> Result<Self::Entity, AppError>;

    /// Removes the row. `NotFound` when nothing matched.
    async fn delete(&self, id: &Self::Id) -> Result<(), AppError>;
}
