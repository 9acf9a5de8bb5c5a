//! Agent registry persistence
//!
//! Owns the SQLite connection pool and every query against the agents table.

use crate::error::AppError;
use crate::registry::models::{Agent, AgentPatch, AgentStatus, NewAgent};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// Database connection pool for the agent registry
pub struct AgentStore {
    pool: SqlitePool,
}

/// Raw row shape; capabilities stay JSON-encoded until conversion
#[derive(sqlx::FromRow)]
struct AgentRow {
    id: i64,
    name: String,
    status: String,
    current_task: Option<String>,
    capabilities: String,
    progress: i64,
    avatar: Option<String>,
    last_active: DateTime<Utc>,
}

impl AgentRow {
    fn into_agent(self) -> Result<Agent, AppError> {
        let status = AgentStatus::parse(&self.status).ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "Unknown status '{}' stored for agent {}",
                self.status,
                self.id
            ))
        })?;

        let capabilities = serde_json::from_str(&self.capabilities).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Corrupt capabilities for agent {}: {}",
                self.id,
                e
            ))
        })?;

        Ok(Agent {
            id: self.id,
            name: self.name,
            status,
            current_task: self.current_task,
            capabilities,
            progress: self.progress,
            avatar: self.avatar,
            last_active: self.last_active,
        })
    }
}

impl AgentStore {
    /// Initialize database connection pool
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    ///
    /// # Returns
    /// * `Ok(AgentStore)` if successful
    /// * `Err(AppError)` if connection failed
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Ensure parent directory exists
        if let Some(parent) = PathBuf::from(db_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
            })?;
        }

        // SQLite connection string format: sqlite://path/to/db.db
        let connection_string = if db_path.starts_with("sqlite:") {
            db_path.to_string()
        } else {
            format!("sqlite:{}", db_path)
        };

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", db_path);

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_agents.sql");

        // Remove comments (lines starting with --) and normalize whitespace
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            let without_comments = if let Some(comment_pos) = trimmed.find("--") {
                &trimmed[..comment_pos]
            } else {
                trimmed
            };
            cleaned_sql.push_str(without_comments.trim());
            cleaned_sql.push(' ');
        }

        // Split by semicolon and filter out empty statements
        let statements: Vec<&str> = cleaned_sql
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get all agents in insertion order
    pub async fn get_agents(&self) -> Result<Vec<Agent>, AppError> {
        let rows = sqlx::query_as::<_, AgentRow>(
            "SELECT id, name, status, current_task, capabilities, progress, avatar, last_active FROM agents ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch agents: {}", e)))?;

        rows.into_iter().map(AgentRow::into_agent).collect()
    }

    /// Get an agent by ID
    pub async fn get_agent(&self, id: i64) -> Result<Option<Agent>, AppError> {
        let row = sqlx::query_as::<_, AgentRow>(
            "SELECT id, name, status, current_task, capabilities, progress, avatar, last_active FROM agents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch agent: {}", e)))?;

        row.map(AgentRow::into_agent).transpose()
    }

    /// Insert a new agent, stamping lastActive with the current time
    ///
    /// The database assigns the ID. Returns the complete stored record.
    pub async fn create_agent(&self, new_agent: NewAgent) -> Result<Agent, AppError> {
        let last_active = Utc::now();
        let capabilities_json = serde_json::to_string(&new_agent.capabilities).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to encode capabilities: {}", e))
        })?;

        let result = sqlx::query(
            "INSERT INTO agents (name, status, current_task, capabilities, progress, avatar, last_active) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_agent.name)
        .bind(new_agent.status.as_str())
        .bind(&new_agent.current_task)
        .bind(&capabilities_json)
        .bind(new_agent.progress)
        .bind(&new_agent.avatar)
        .bind(last_active)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create agent: {}", e)))?;

        let id = result.last_insert_rowid();
        debug!("Created agent {} ({})", id, new_agent.name);

        Ok(Agent {
            id,
            name: new_agent.name,
            status: new_agent.status,
            current_task: new_agent.current_task,
            capabilities: new_agent.capabilities,
            progress: new_agent.progress,
            avatar: new_agent.avatar,
            last_active,
        })
    }

    /// Apply a partial update to an agent
    ///
    /// Fetches the current record and rewrites it with the patched fields
    /// inside one transaction. `id` and `lastActive` are never touched.
    /// Returns `Ok(None)` if no agent has the given ID.
    pub async fn update_agent(
        &self,
        id: i64,
        patch: AgentPatch,
    ) -> Result<Option<Agent>, AppError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to start transaction: {}", e))
        })?;

        let row = sqlx::query_as::<_, AgentRow>(
            "SELECT id, name, status, current_task, capabilities, progress, avatar, last_active FROM agents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch agent: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut agent = row.into_agent()?;

        if let Some(name) = patch.name {
            agent.name = name;
        }
        if let Some(status) = patch.status {
            agent.status = status;
        }
        if let Some(current_task) = patch.current_task {
            agent.current_task = current_task;
        }
        if let Some(capabilities) = patch.capabilities {
            agent.capabilities = capabilities;
        }
        if let Some(progress) = patch.progress {
            agent.progress = progress;
        }
        if let Some(avatar) = patch.avatar {
            agent.avatar = avatar;
        }

        let capabilities_json = serde_json::to_string(&agent.capabilities).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to encode capabilities: {}", e))
        })?;

        sqlx::query(
            "UPDATE agents SET name = ?, status = ?, current_task = ?, capabilities = ?, progress = ?, avatar = ? WHERE id = ?",
        )
        .bind(&agent.name)
        .bind(agent.status.as_str())
        .bind(&agent.current_task)
        .bind(&capabilities_json)
        .bind(agent.progress)
        .bind(&agent.avatar)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to update agent: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to commit update: {}", e)))?;

        debug!("Updated agent: {}", id);
        Ok(Some(agent))
    }

    /// Number of agents in the registry
    pub async fn count_agents(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM agents")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to count agents: {}", e)))?;

        Ok(count)
    }
}
