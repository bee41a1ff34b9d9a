use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    constants::SYSTEM_VARIABLE_PREFIX,
    entities::variable::{Variable, VariableInsert},
    errors::AppError,
    repositories::{repository::Repository, sqlx_repo::SqlxVariableRepo},
};

/// The value column is an opaque string; callers own (de)serialization.
/// `delete` refuses rows whose name carries the `system.` prefix.
#[async_trait]
pub trait VariableRepository:
    Repository<Entity = Variable, Id = Uuid, Insert = VariableInsert>
{
    async fn get_by_name(&self, name: &str) -> Result<Option<Variable>, AppError>;

    async fn update_value(&self, id: &Uuid, value: &str) -> Result<Variable, AppError>;
}

impl SqlxVariableRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxVariableRepo { pool }
    }
}

#[async_trait]
impl Repository for SqlxVariableRepo {
    type Entity = Variable;
    type Id = Uuid;
    type Insert = VariableInsert;

    async fn get(&self, id: &Uuid) -> Result<Option<Variable>, AppError> {
        let variable = sqlx::query_as::<_, Variable>(
            "SELECT * FROM variables WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variable)
    }

    async fn list(&self) -> Result<Vec<Variable>, AppError> {
        let variables = sqlx::query_as::<_, Variable>(
            "SELECT * FROM variables ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(variables)
    }

    async fn create(&self, insert: &VariableInsert) -> Result<Variable, AppError> {
        let variable = sqlx::query_as::<_, Variable>(
            r#"
            INSERT INTO variables (id, name, value)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(insert.id)
        .bind(&insert.name)
        .bind(&insert.value)
        .fetch_one(&self.pool)
        .await?;

        Ok(variable)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), AppError> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Variable record".into()))?;

        if existing.name.starts_with(SYSTEM_VARIABLE_PREFIX) {
            return Err(AppError::Conflict(format!(
                "Cannot delete system variable: {}",
                existing.name
            )));
        }

        sqlx::query("DELETE FROM variables WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl VariableRepository for SqlxVariableRepo {
    async fn get_by_name(&self, name: &str) -> Result<Option<Variable>, AppError> {
        let variable = sqlx::query_as::<_, Variable>(
            "SELECT * FROM variables WHERE name = $1"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variable)
    }

    async fn update_value(&self, id: &Uuid, value: &str) -> Result<Variable, AppError> {
        let variable = sqlx::query_as::<_, Variable>(
            r#"
            UPDATE variables
            SET value = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(value)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Variable record".into()))?;

        Ok(variable)
    }
}
