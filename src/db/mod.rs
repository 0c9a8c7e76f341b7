use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{assets, contacts, mood_entries, notes, projects, tasks};
use crate::models::asset::{AssetPatch, NewAsset};
use crate::models::contact::{ContactPatch, NewContact};
use crate::models::mood::NewMoodEntry;
use crate::models::note::{NewNote, NotePatch};
use crate::models::project::{NewProject, ProjectPatch};
use crate::models::task::{NewTask, TaskFilter, TaskPatch};
use crate::models::user::{NewUser, UserDto};

pub mod migrator;
pub mod repositories;

/// Persistence facade. Each entity has its own repository; the store hands
/// out short-lived repositories over the shared connection pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if let Some(path_str) = sqlite_file_path(db_url) {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn project_repo(&self) -> repositories::project::ProjectRepository {
        repositories::project::ProjectRepository::new(self.conn.clone())
    }

    fn task_repo(&self) -> repositories::task::TaskRepository {
        repositories::task::TaskRepository::new(self.conn.clone())
    }

    fn contact_repo(&self) -> repositories::contact::ContactRepository {
        repositories::contact::ContactRepository::new(self.conn.clone())
    }

    fn note_repo(&self) -> repositories::note::NoteRepository {
        repositories::note::NoteRepository::new(self.conn.clone())
    }

    fn asset_repo(&self) -> repositories::asset::AssetRepository {
        repositories::asset::AssetRepository::new(self.conn.clone())
    }

    fn mood_repo(&self) -> repositories::mood::MoodRepository {
        repositories::mood::MoodRepository::new(self.conn.clone())
    }

    // Users

    pub async fn create_user(
        &self,
        input: NewUser,
        security: &SecurityConfig,
    ) -> Result<Option<UserDto>> {
        self.user_repo().create(input, security).await
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<UserDto>> {
        self.user_repo().get(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<UserDto>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn user_exists(&self, id: &str) -> Result<bool> {
        self.user_repo().exists(id).await
    }

    // Projects

    pub async fn list_projects(&self, owner_id: &str) -> Result<Vec<projects::Model>> {
        self.project_repo().list(owner_id).await
    }

    pub async fn get_project(&self, id: &str) -> Result<Option<projects::Model>> {
        self.project_repo().get(id).await
    }

    pub async fn create_project(&self, input: NewProject) -> Result<projects::Model> {
        self.project_repo().create(input).await
    }

    pub async fn update_project(
        &self,
        id: &str,
        patch: ProjectPatch,
    ) -> Result<Option<projects::Model>> {
        self.project_repo().update(id, patch).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<bool> {
        self.project_repo().delete(id).await
    }

    // Tasks

    pub async fn list_tasks(&self, owner_id: &str, filter: TaskFilter) -> Result<Vec<tasks::Model>> {
        self.task_repo().list(owner_id, filter).await
    }

    pub async fn get_task(&self, id: &str) -> Result<Option<tasks::Model>> {
        self.task_repo().get(id).await
    }

    pub async fn create_task(&self, input: NewTask) -> Result<tasks::Model> {
        self.task_repo().create(input).await
    }

    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Option<tasks::Model>> {
        self.task_repo().update(id, patch).await
    }

    pub async fn delete_task(&self, id: &str) -> Result<bool> {
        self.task_repo().delete(id).await
    }

    // Contacts

    pub async fn list_contacts(&self, owner_id: &str) -> Result<Vec<contacts::Model>> {
        self.contact_repo().list(owner_id).await
    }

    pub async fn list_due_contacts(
        &self,
        owner_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<contacts::Model>> {
        self.contact_repo().list_due(owner_id, today).await
    }

    pub async fn get_contact(&self, id: &str) -> Result<Option<contacts::Model>> {
        self.contact_repo().get(id).await
    }

    pub async fn create_contact(&self, input: NewContact) -> Result<contacts::Model> {
        self.contact_repo().create(input).await
    }

    pub async fn update_contact(
        &self,
        id: &str,
        patch: ContactPatch,
    ) -> Result<Option<contacts::Model>> {
        self.contact_repo().update(id, patch).await
    }

    pub async fn mark_contacted(
        &self,
        id: &str,
        today: NaiveDate,
    ) -> Result<Option<contacts::Model>> {
        self.contact_repo().mark_contacted(id, today).await
    }

    pub async fn delete_contact(&self, id: &str) -> Result<bool> {
        self.contact_repo().delete(id).await
    }

    // Notes

    pub async fn list_notes(&self, owner_id: &str) -> Result<Vec<notes::Model>> {
        self.note_repo().list(owner_id).await
    }

    pub async fn get_note(&self, id: &str) -> Result<Option<notes::Model>> {
        self.note_repo().get(id).await
    }

    pub async fn create_note(&self, input: NewNote) -> Result<notes::Model> {
        self.note_repo().create(input).await
    }

    pub async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<notes::Model>> {
        self.note_repo().update(id, patch).await
    }

    pub async fn delete_note(&self, id: &str) -> Result<bool> {
        self.note_repo().delete(id).await
    }

    // Assets

    pub async fn list_assets(&self, owner_id: &str) -> Result<Vec<assets::Model>> {
        self.asset_repo().list(owner_id).await
    }

    pub async fn list_expiring_assets(
        &self,
        owner_id: &str,
        today: NaiveDate,
        within_days: u32,
    ) -> Result<Vec<assets::Model>> {
        self.asset_repo()
            .list_expiring(owner_id, today, within_days)
            .await
    }

    pub async fn get_asset(&self, id: &str) -> Result<Option<assets::Model>> {
        self.asset_repo().get(id).await
    }

    pub async fn create_asset(&self, input: NewAsset) -> Result<assets::Model> {
        self.asset_repo().create(input).await
    }

    pub async fn update_asset(&self, id: &str, patch: AssetPatch) -> Result<Option<assets::Model>> {
        self.asset_repo().update(id, patch).await
    }

    pub async fn delete_asset(&self, id: &str) -> Result<bool> {
        self.asset_repo().delete(id).await
    }

    // Mood

    pub async fn list_mood_entries(
        &self,
        owner_id: &str,
        limit: Option<u64>,
    ) -> Result<Vec<mood_entries::Model>> {
        self.mood_repo().list(owner_id, limit).await
    }

    pub async fn get_mood_entry(&self, id: &str) -> Result<Option<mood_entries::Model>> {
        self.mood_repo().get(id).await
    }

    pub async fn create_mood_entry(&self, input: NewMoodEntry) -> Result<mood_entries::Model> {
        self.mood_repo().create(input).await
    }
}

/// File path of a file-backed SQLite URL, `None` for in-memory or other
/// backends.
fn sqlite_file_path(db_url: &str) -> Option<&str> {
    let path = db_url.strip_prefix("sqlite:")?;
    let path = path.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(path)
    }
}
