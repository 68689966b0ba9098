//! Import Service
//!
//! Entry points for the two-phase bookmark import:
//!
//! 1. [`ImportService::preview`] validates the upload, parses it, snapshots
//!    the destination and returns a plan plus summary. Nothing is written.
//! 2. [`ImportService::apply`] executes a previously returned plan as given.
//!
//! [`ImportService::import_bookmarks`] is the older single-call entry point
//! (`dryRun` stops after preview) and keeps its original response shape.
//!
//! # Examples
//!
//! ```rust,no_run
//! use navhub_core::config::ImportConfig;
//! use navhub_core::db::{DatabaseService, NavStore, TursoStore};
//! use navhub_core::services::{ApplyRequest, ImportService, PreviewRequest, UploadedFile};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/navhub.db")).await?);
//!     let store: Arc<dyn NavStore> = Arc::new(TursoStore::new(db));
//!     let service = ImportService::new(store, ImportConfig::default())?;
//!
//!     let html = std::fs::read("bookmarks.html")?;
//!     let preview = service
//!         .preview(PreviewRequest {
//!             file: Some(UploadedFile::new("bookmarks.html", html)),
//!             mode: "merge".to_string(),
//!             target: "auto".to_string(),
//!         })
//!         .await?;
//!
//!     let applied = service.apply(ApplyRequest::from_preview(&preview)).await?;
//!     println!("created {} cards", applied.cards_created);
//!     Ok(())
//! }
//! ```

use crate::config::ImportConfig;
use crate::db::NavStore;
use crate::import::{
    generate_import_plan, parse_bookmark_html, ExecutionReport, ImportMode, ImportSummary,
    ImportTarget, PlanExecutor, PlanRequest, PlanTarget,
};
use crate::models::{BookmarkRecord, CardScope, DestinationSnapshot, ImportPlan, PlanStats};
use crate::services::error::ImportServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// An uploaded bookmark export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Raw preview parameters; mode and target are validated by the service
#[derive(Debug, Clone, Default)]
pub struct PreviewRequest {
    pub file: Option<UploadedFile>,
    pub mode: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub preview_id: String,
    pub generated_at: DateTime<Utc>,
    pub mode: ImportMode,
    pub target: ImportTarget,
    pub plan: ImportPlan,
    pub summary: ImportSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub plan: ImportPlan,
    pub mode: String,
    pub target_type: String,
    #[serde(default)]
    pub target_menu_id: Option<i64>,
    /// Carried into logs only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_id: Option<String>,
}

impl ApplyRequest {
    /// Apply a preview exactly as it was returned
    pub fn from_preview(preview: &PreviewResponse) -> Self {
        Self {
            plan: preview.plan.clone(),
            mode: preview.mode.to_string(),
            target_type: preview.target.target_type().to_string(),
            target_menu_id: preview.target.menu_id(),
            preview_id: Some(preview.preview_id.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub menus_created: usize,
    pub menus_reused: usize,
    pub groups_created: usize,
    pub groups_reused: usize,
    pub cards_created: usize,
    pub cards_skipped: usize,
    pub errors: Vec<String>,
}

impl From<ExecutionReport> for ApplyResponse {
    fn from(report: ExecutionReport) -> Self {
        Self {
            menus_created: report.menus_created,
            menus_reused: report.menus_reused,
            groups_created: report.groups_created,
            groups_reused: report.groups_reused,
            cards_created: report.cards_created,
            cards_skipped: report.cards_skipped,
            errors: report.errors,
        }
    }
}

/// User-visible wrapper: `{ ok, message?, ...payload }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportEnvelope<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> ImportEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl<T> From<Result<T, ImportServiceError>> for ImportEnvelope<T> {
    fn from(result: Result<T, ImportServiceError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// Single-call import request
#[derive(Debug, Clone, Default)]
pub struct LegacyImportRequest {
    pub file: Option<UploadedFile>,
    pub mode: String,
    pub target: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyImportResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub dry_run: bool,
    pub stats: PlanStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ImportSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ApplyResponse>,
    pub errors: Vec<String>,
}

/// Bookmark import orchestration over a [`NavStore`]
pub struct ImportService {
    store: Arc<dyn NavStore>,
    config: ImportConfig,
}

impl ImportService {
    /// Create a service, rejecting invalid configuration
    pub fn new(store: Arc<dyn NavStore>, config: ImportConfig) -> Result<Self, ImportServiceError> {
        config.validate().map_err(ImportServiceError::InvalidConfig)?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parse, snapshot and plan without writing anything
    pub async fn preview(
        &self,
        request: PreviewRequest,
    ) -> Result<PreviewResponse, ImportServiceError> {
        let preview_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("import_preview", preview_id = %preview_id);

        self.preview_inner(preview_id.clone(), request)
            .instrument(span)
            .await
    }

    async fn preview_inner(
        &self,
        preview_id: String,
        request: PreviewRequest,
    ) -> Result<PreviewResponse, ImportServiceError> {
        let file = request.file.ok_or(ImportServiceError::MissingFile)?;

        if file.bytes.len() > self.config.max_file_size {
            return Err(ImportServiceError::file_too_large(
                file.bytes.len(),
                self.config.max_file_size,
            ));
        }

        let mode = ImportMode::parse(&request.mode)?;
        let target = ImportTarget::parse(&request.target)?;

        let content = String::from_utf8_lossy(&file.bytes);
        if content.trim().len() < self.config.min_content_length {
            return Err(ImportServiceError::EmptyFile);
        }

        let outcome = parse_bookmark_html(&content);
        if !outcome.errors.is_empty() {
            tracing::warn!(
                file = %file.name,
                errors = outcome.errors.len(),
                "Bookmark file parsed with errors"
            );
        }
        if outcome.bookmarks.is_empty() {
            return Err(ImportServiceError::NoBookmarks {
                errors: outcome.errors,
            });
        }

        let mut snapshot = self.load_snapshot(target).await?;

        let plan_target = match target {
            ImportTarget::Auto => PlanTarget::Auto,
            ImportTarget::Menu(id) => {
                let name = snapshot
                    .menu_name(id)
                    .ok_or_else(|| ImportServiceError::unknown_target_menu(id))?;
                PlanTarget::Menu {
                    id,
                    name: name.to_string(),
                }
            }
        };

        if mode.is_replace() {
            for menu_id in self.affected_menus(&plan_target, &outcome.bookmarks, &snapshot) {
                tracing::debug!(menu_id, "Clearing snapshot URLs for replace");
                snapshot.clear_urls_for_menu(menu_id);
            }
        }

        let options = self.config.planner_options();
        let plan = generate_import_plan(PlanRequest {
            bookmarks: &outcome.bookmarks,
            root_folders: &outcome.root_folders,
            target: &plan_target,
            snapshot: &snapshot,
            options: &options,
        });
        let summary = ImportSummary::build(&plan, &outcome.errors, self.config.sample_limit);

        tracing::info!(
            file = %file.name,
            bookmarks = outcome.bookmarks.len(),
            menus = plan.menus.len(),
            groups = plan.groups.len(),
            cards_to_create = plan.stats.cards_to_create,
            cards_to_skip = plan.stats.cards_to_skip,
            %mode,
            %target,
            "Generated import preview"
        );

        Ok(PreviewResponse {
            preview_id,
            generated_at: Utc::now(),
            mode,
            target,
            plan,
            summary,
        })
    }

    /// Execute a previously previewed plan
    pub async fn apply(&self, request: ApplyRequest) -> Result<ApplyResponse, ImportServiceError> {
        let preview_id = request.preview_id.clone().unwrap_or_default();
        let span = tracing::info_span!("import_apply", preview_id = %preview_id);

        self.apply_inner(request).instrument(span).await
    }

    async fn apply_inner(&self, request: ApplyRequest) -> Result<ApplyResponse, ImportServiceError> {
        let mode = ImportMode::parse(&request.mode)?;
        let target = ImportTarget::from_parts(&request.target_type, request.target_menu_id)?;

        if let ImportTarget::Menu(id) = target {
            if self.store.get_menu(id).await?.is_none() {
                return Err(ImportServiceError::unknown_target_menu(id));
            }
        }

        if !request.plan.references_resolve() {
            tracing::warn!("Plan contains entries referencing unknown keys");
        }

        let replace_menu_ids = match (mode, target) {
            (ImportMode::Merge, _) => Vec::new(),
            (ImportMode::Replace, ImportTarget::Menu(id)) => vec![id],
            (ImportMode::Replace, ImportTarget::Auto) => request.plan.reused_menu_ids(),
        };

        let executor =
            PlanExecutor::new(Arc::clone(&self.store)).with_batch_size(self.config.batch_size);
        let report = executor.execute(&request.plan, &replace_menu_ids).await?;

        if !report.errors.is_empty() {
            tracing::warn!(errors = report.errors.len(), "Import applied with errors");
        }

        Ok(report.into())
    }

    /// Single-call import: preview, then apply unless `dry_run`
    pub async fn import_bookmarks(&self, request: LegacyImportRequest) -> LegacyImportResponse {
        let dry_run = request.dry_run;
        let failed = |e: ImportServiceError| {
            let errors = match &e {
                ImportServiceError::NoBookmarks { errors } => errors.clone(),
                _ => Vec::new(),
            };
            LegacyImportResponse {
                ok: false,
                message: Some(e.to_string()),
                dry_run,
                errors,
                ..Default::default()
            }
        };

        let preview = match self
            .preview(PreviewRequest {
                file: request.file,
                mode: request.mode,
                target: request.target,
            })
            .await
        {
            Ok(preview) => preview,
            Err(e) => return failed(e),
        };

        let stats = preview.plan.stats;
        let mut errors = preview.summary.errors.clone();

        if dry_run {
            return LegacyImportResponse {
                ok: true,
                message: None,
                dry_run,
                stats,
                summary: Some(preview.summary),
                result: None,
                errors,
            };
        }

        match self.apply(ApplyRequest::from_preview(&preview)).await {
            Ok(result) => {
                errors.extend(result.errors.iter().cloned());
                LegacyImportResponse {
                    ok: true,
                    message: None,
                    dry_run,
                    stats,
                    summary: Some(preview.summary),
                    result: Some(result),
                    errors,
                }
            }
            Err(e) => failed(e),
        }
    }

    /// Load destination state; explicit targets only need their own cards
    async fn load_snapshot(&self, target: ImportTarget) -> anyhow::Result<DestinationSnapshot> {
        let menus = self.store.list_menus().await?;
        let groups = self.store.list_groups().await?;
        let scope = match target {
            ImportTarget::Auto => CardScope::All,
            ImportTarget::Menu(id) => CardScope::Menu(id),
        };
        let cards = self.store.list_card_urls(scope).await?;
        let (group_rows, card_rows) = (groups.len(), cards.len());

        let snapshot = DestinationSnapshot::from_records(menus, groups, cards);
        tracing::debug!(
            menus = snapshot.menu_count(),
            groups = group_rows,
            cards = card_rows,
            distinct_urls = snapshot.url_count(),
            "Loaded destination snapshot"
        );

        Ok(snapshot)
    }

    /// Existing menus a replace-mode import will wipe
    fn affected_menus(
        &self,
        target: &PlanTarget,
        bookmarks: &[BookmarkRecord],
        snapshot: &DestinationSnapshot,
    ) -> Vec<i64> {
        match target {
            PlanTarget::Menu { id, .. } => vec![*id],
            PlanTarget::Auto => {
                let mut seen = HashSet::new();
                bookmarks
                    .iter()
                    .map(|b| {
                        b.root_folder
                            .as_deref()
                            .unwrap_or(&self.config.fallback_menu_name)
                    })
                    .filter_map(|name| snapshot.menu_id(name))
                    .filter(|id| seen.insert(*id))
                    .collect()
            }
        }
    }
}
