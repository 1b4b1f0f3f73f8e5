use anyhow::Result;
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::core::agents::types::{AgentRole, Artifact, TaskStatus};

/// One row per agent invocation, mutated exactly once at completion or
/// failure.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: String,
    pub agent_role: String,
    pub action: String,
    pub status: String,
    pub project_id: String,
    pub input: String,
    pub output: Option<String>,
    pub error: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl TaskRecord {
    pub fn status(&self) -> Option<TaskStatus> {
        TaskStatus::from_status(&self.status)
    }
}

/// One row per artifact produced by a successful run. Append-only;
/// `task_id` records which invocation produced it.
#[derive(Debug, Clone)]
pub struct AssetRecord {
    pub id: i64,
    pub project_id: String,
    pub task_id: String,
    pub kind: String,
    pub title: String,
    pub content: String,
    pub format: String,
    pub created_at: String,
}

/// Task and asset persistence for the agent pipeline. Create/update only:
/// nothing here deletes rows.
#[derive(Clone)]
pub struct ProjectStore {
    db: Arc<Mutex<Connection>>,
}

impl ProjectStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Connection::open(path.as_ref())?;
        Self::init_schema(&db)?;
        info!("Project store opened at {:?}", path.as_ref());
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init_schema(&db)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    fn init_schema(db: &Connection) -> Result<()> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS agent_tasks (
                id TEXT PRIMARY KEY,
                agent_role TEXT NOT NULL,
                action TEXT NOT NULL,
                status TEXT NOT NULL,
                project_id TEXT NOT NULL,
                input TEXT NOT NULL,
                output TEXT,
                error TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                completed_at DATETIME
            )",
            [],
        )?;
        db.execute(
            "CREATE TABLE IF NOT EXISTS generated_assets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id TEXT NOT NULL,
                task_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                format TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        db.execute(
            "CREATE INDEX IF NOT EXISTS idx_agent_tasks_project_created ON agent_tasks(project_id, created_at)",
            [],
        )?;
        db.execute(
            "CREATE INDEX IF NOT EXISTS idx_generated_assets_project ON generated_assets(project_id)",
            [],
        )?;
        Ok(())
    }

    pub async fn create_task(
        &self,
        role: AgentRole,
        action: &str,
        project_id: &str,
        input_json: &str,
    ) -> Result<TaskRecord> {
        let task_id = uuid::Uuid::new_v4().to_string();
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO agent_tasks (id, agent_role, action, status, project_id, input)
             VALUES (?1, ?2, ?3, 'processing', ?4, ?5)",
            params![task_id, role.as_str(), action, project_id, input_json],
        )?;
        let rec = db.query_row(
            "SELECT id, agent_role, action, status, project_id, input, output, error, created_at, completed_at
             FROM agent_tasks WHERE id = ?1",
            params![task_id],
            Self::map_task_row,
        )?;
        Ok(rec)
    }

    /// Marks a processing task completed. Returns false when the task does
    /// not exist or already reached a terminal status; the guard keeps the
    /// processing -> terminal transition single-shot.
    pub async fn complete_task(&self, task_id: &str, output_json: &str) -> Result<bool> {
        let db = self.db.lock().await;
        let rows = db.execute(
            "UPDATE agent_tasks
             SET status = 'completed', output = ?1, completed_at = CURRENT_TIMESTAMP
             WHERE id = ?2 AND status = 'processing'",
            params![output_json, task_id],
        )?;
        Ok(rows > 0)
    }

    pub async fn fail_task(&self, task_id: &str, error: &str) -> Result<bool> {
        let db = self.db.lock().await;
        let rows = db.execute(
            "UPDATE agent_tasks
             SET status = 'failed', error = ?1, completed_at = CURRENT_TIMESTAMP
             WHERE id = ?2 AND status = 'processing'",
            params![error, task_id],
        )?;
        Ok(rows > 0)
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Option<TaskRecord>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, agent_role, action, status, project_id, input, output, error, created_at, completed_at
             FROM agent_tasks WHERE id = ?1 LIMIT 1",
        )?;
        let mut rows = stmt.query(params![task_id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Self::map_task_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list_tasks(&self, project_id: &str, limit: usize) -> Result<Vec<TaskRecord>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, agent_role, action, status, project_id, input, output, error, created_at, completed_at
             FROM agent_tasks WHERE project_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![project_id, limit as i64], Self::map_task_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub async fn add_asset(
        &self,
        project_id: &str,
        task_id: &str,
        artifact: &Artifact,
    ) -> Result<AssetRecord> {
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO generated_assets (project_id, task_id, kind, title, content, format)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                project_id,
                task_id,
                artifact.kind.as_str(),
                artifact.title,
                artifact.content,
                artifact.format.as_str()
            ],
        )?;
        let id = db.last_insert_rowid();
        let rec = db.query_row(
            "SELECT id, project_id, task_id, kind, title, content, format, created_at
             FROM generated_assets WHERE id = ?1",
            params![id],
            Self::map_asset_row,
        )?;
        Ok(rec)
    }

    pub async fn list_assets(&self, project_id: &str) -> Result<Vec<AssetRecord>> {
        let db = self.db.lock().await;
        let mut stmt = db.prepare(
            "SELECT id, project_id, task_id, kind, title, content, format, created_at
             FROM generated_assets WHERE project_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![project_id], Self::map_asset_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn map_task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRecord> {
        Ok(TaskRecord {
            id: row.get(0)?,
            agent_role: row.get(1)?,
            action: row.get(2)?,
            status: row.get(3)?,
            project_id: row.get(4)?,
            input: row.get(5)?,
            output: row.get(6)?,
            error: row.get(7)?,
            created_at: row.get(8)?,
            completed_at: row.get(9)?,
        })
    }

    fn map_asset_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AssetRecord> {
        Ok(AssetRecord {
            id: row.get(0)?,
            project_id: row.get(1)?,
            task_id: row.get(2)?,
            kind: row.get(3)?,
            title: row.get(4)?,
            content: row.get(5)?,
            format: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::agents::types::{AssetFormat, AssetKind};

    fn doc(title: &str) -> Artifact {
        Artifact {
            title: title.to_string(),
            kind: AssetKind::Document,
            content: "# Hello".to_string(),
            format: AssetFormat::Markdown,
        }
    }

    #[tokio::test]
    async fn create_task_starts_processing() {
        let store = ProjectStore::open_in_memory().unwrap();
        let task = store
            .create_task(AgentRole::Ceo, "execute", "p1", "{}")
            .await
            .unwrap();
        assert_eq!(task.status(), Some(TaskStatus::Processing));
        assert_eq!(task.agent_role, "ceo");
        assert_eq!(task.project_id, "p1");
        assert!(task.completed_at.is_none());
    }

    #[tokio::test]
    async fn complete_task_is_single_shot() {
        let store = ProjectStore::open_in_memory().unwrap();
        let task = store
            .create_task(AgentRole::Pm, "execute", "p1", "{}")
            .await
            .unwrap();
        assert!(store.complete_task(&task.id, r#"{"ok":true}"#).await.unwrap());
        assert!(!store.complete_task(&task.id, r#"{"ok":true}"#).await.unwrap());
        assert!(!store.fail_task(&task.id, "late error").await.unwrap());

        let got = store.get_task(&task.id).await.unwrap().unwrap();
        assert_eq!(got.status(), Some(TaskStatus::Completed));
        assert_eq!(got.output.as_deref(), Some(r#"{"ok":true}"#));
        assert!(got.error.is_none());
        assert!(got.completed_at.is_some());
    }

    #[tokio::test]
    async fn fail_task_records_error() {
        let store = ProjectStore::open_in_memory().unwrap();
        let task = store
            .create_task(AgentRole::Legal, "execute", "p1", "{}")
            .await
            .unwrap();
        assert!(store.fail_task(&task.id, "boom").await.unwrap());
        let got = store.get_task(&task.id).await.unwrap().unwrap();
        assert_eq!(got.status(), Some(TaskStatus::Failed));
        assert_eq!(got.error.as_deref(), Some("boom"));
        assert!(got.output.is_none());
    }

    #[tokio::test]
    async fn assets_carry_project_and_task_provenance() {
        let store = ProjectStore::open_in_memory().unwrap();
        let task = store
            .create_task(AgentRole::Cto, "execute", "p7", "{}")
            .await
            .unwrap();
        store.add_asset("p7", &task.id, &doc("A.md")).await.unwrap();
        store.add_asset("p7", &task.id, &doc("B.md")).await.unwrap();

        let assets = store.list_assets("p7").await.unwrap();
        assert_eq!(assets.len(), 2);
        for asset in &assets {
            assert_eq!(asset.project_id, "p7");
            assert_eq!(asset.task_id, task.id);
            assert_eq!(asset.kind, "document");
            assert_eq!(asset.format, "markdown");
        }
        assert!(store.list_assets("other").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_tasks_filters_by_project_and_respects_limit() {
        let store = ProjectStore::open_in_memory().unwrap();
        for _ in 0..4 {
            store
                .create_task(AgentRole::Ceo, "execute", "p1", "{}")
                .await
                .unwrap();
        }
        store
            .create_task(AgentRole::Ceo, "execute", "p2", "{}")
            .await
            .unwrap();
        assert_eq!(store.list_tasks("p1", 10).await.unwrap().len(), 4);
        assert_eq!(store.list_tasks("p1", 2).await.unwrap().len(), 2);
        assert_eq!(store.list_tasks("p2", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn open_on_disk_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("startlabx.db");
        {
            let store = ProjectStore::open(&path).unwrap();
            store
                .create_task(AgentRole::Marketing, "execute", "p1", "{}")
                .await
                .unwrap();
        }
        let store = ProjectStore::open(&path).unwrap();
        assert_eq!(store.list_tasks("p1", 10).await.unwrap().len(), 1);
    }
}
