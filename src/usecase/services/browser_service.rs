use tracing::{debug, info, warn};

use crate::domain::catalog::SchemaRegistry;
use crate::domain::entities::result::QueryResult;
use crate::domain::error::BrowserResult;
use crate::usecase::ports::engine::QueryEngine;
use crate::usecase::ports::ui::GridWidget;
use crate::usecase::services::filter_reader::{read_filter_values, FormState};
use crate::usecase::services::projection::ProjectionChange;
use crate::usecase::services::query_builder::build_query;
use crate::usecase::services::query_service::QueryService;
use crate::usecase::services::reconcile::{self, grid_columns, CsvExport, RenderingAdapter};
use crate::usecase::services::session::{DatasetSession, FilterOptions, SessionState, TabState};

/// Command surface of the browser. Owns the engine, the per-dataset session
/// state and one grid per dataset.
pub struct DataBrowser<G: GridWidget + Default> {
    registry: SchemaRegistry,
    queries: QueryService,
    session: SessionState,
    adapter: RenderingAdapter<G>,
    status: String,
}

impl<G: GridWidget + Default> DataBrowser<G> {
    pub fn new(registry: SchemaRegistry, engine: Box<dyn QueryEngine>) -> Self {
        Self {
            registry,
            queries: QueryService::new(engine),
            session: SessionState::new(),
            adapter: RenderingAdapter::new(),
            status: String::new(),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Read-only view of a dataset that has already been touched.
    pub fn dataset(&self, key: &str) -> Option<&DatasetSession> {
        self.session.dataset(key)
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.session.active()
    }

    pub fn grid(&self, key: &str) -> Option<&G> {
        self.adapter.grid(key)
    }

    pub fn grid_mut(&mut self, key: &str) -> Option<&mut G> {
        self.adapter.grid_mut(key)
    }

    pub fn tab_state(&self, key: &str) -> TabState {
        self.session
            .dataset(key)
            .map(|dataset| dataset.tab)
            .unwrap_or_default()
    }

    pub fn last_result(&self, key: &str) -> Option<&QueryResult> {
        self.session
            .dataset(key)
            .and_then(|dataset| dataset.last_result.as_ref())
    }

    pub fn filter_options(&self, key: &str) -> Option<&FilterOptions> {
        self.session.dataset(key).map(|dataset| &dataset.options)
    }

    pub fn validate_catalog(&self) -> BrowserResult<()> {
        self.queries.validate_catalog(&self.registry)
    }

    /// Loads widget options for every dataset. Runs once after bootstrap.
    pub fn hydrate_filters(&mut self) -> BrowserResult<()> {
        for schema in self.registry.schemas() {
            let options = self.queries.hydrate(schema)?;
            self.session.dataset_mut(schema).options = options;
        }
        info!(datasets = self.registry.schemas().len(), "filter options hydrated");
        Ok(())
    }

    pub fn controls(&mut self, key: &str) -> BrowserResult<&FormState> {
        Ok(&self.dataset_mut(key)?.controls)
    }

    pub fn controls_mut(&mut self, key: &str) -> BrowserResult<&mut FormState> {
        Ok(&mut self.dataset_mut(key)?.controls)
    }

    pub fn visible_columns(&mut self, key: &str) -> BrowserResult<Vec<String>> {
        Ok(self.dataset_mut(key)?.projection.visible().to_vec())
    }

    /// Activates a tab. The first activation of a dataset runs its query
    /// with the current controls.
    pub fn select_tab(&mut self, key: &str) -> BrowserResult<TabState> {
        let tab = self.dataset_mut(key)?.tab;
        self.session.set_active(key);
        if tab != TabState::Unloaded {
            return Ok(tab);
        }

        self.dataset_mut(key)?.tab = TabState::Loading;
        debug!(dataset = key, "first activation");
        match self.apply_filters(key) {
            Ok(_) => {
                self.dataset_mut(key)?.tab = TabState::Loaded;
                Ok(TabState::Loaded)
            }
            Err(err) => {
                self.dataset_mut(key)?.tab = TabState::Unloaded;
                Err(err)
            }
        }
    }

    /// Reads the controls, runs the query and pushes the rows to the grid.
    /// Returns the number of rows shown.
    pub fn apply_filters(&mut self, key: &str) -> BrowserResult<usize> {
        let schema = self.registry.get_schema(key)?;
        let dataset = self.session.dataset_mut(schema);
        dataset.filter_values = read_filter_values(schema, &dataset.controls);
        let visible = dataset.projection.visible().to_vec();
        debug!(
            dataset = key,
            active_filters = dataset.filter_values.active_count(),
            "applying filters"
        );

        let outcome = build_query(schema, &visible, &dataset.filter_values)
            .and_then(|query| self.queries.run(&query).map_err(Into::into));
        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                warn!(dataset = key, error = %err, "query failed");
                self.status = format!("Erro ao consultar {}: {err}", schema.label);
                return Err(err);
            }
        };

        let count = result.rows.len();
        let completed = result.completed_label();
        self.adapter
            .apply(key, grid_columns(schema, &visible), result.rows.clone());
        dataset.last_result = Some(result);
        self.status = format!("Resultados {}: {count}. Atualizado às {completed}.", schema.label);
        Ok(count)
    }

    /// Puts the controls back to their defaults and queries again.
    pub fn clear_filters(&mut self, key: &str) -> BrowserResult<usize> {
        let schema = self.registry.get_schema(key)?;
        self.session.dataset_mut(schema).controls.reset(schema);
        debug!(dataset = key, "filters cleared");
        self.apply_filters(key)
    }

    pub fn set_column_visibility<S: AsRef<str>>(
        &mut self,
        key: &str,
        column_ids: &[S],
    ) -> BrowserResult<ProjectionChange> {
        let schema = self.registry.get_schema(key)?;
        let dataset = self.session.dataset_mut(schema);
        let previous = dataset.projection.clone();
        if !dataset.projection.replace(schema, column_ids) {
            debug!(dataset = key, "refusing to hide every column");
            return Ok(ProjectionChange::Rejected);
        }

        let visible = dataset.projection.visible().to_vec();
        let cached_rows = match &dataset.last_result {
            Some(result) if result.covers(&visible) => Some(result.rows.clone()),
            Some(_) => None,
            None => return Ok(ProjectionChange::Stored),
        };

        match cached_rows {
            Some(rows) => {
                self.adapter.apply(key, grid_columns(schema, &visible), rows);
                Ok(ProjectionChange::Reprojected)
            }
            None => match self.apply_filters(key) {
                Ok(_) => Ok(ProjectionChange::Requeried),
                Err(err) => {
                    // The grid still shows the previous columns.
                    self.dataset_mut(key)?.projection = previous;
                    Err(err)
                }
            },
        }
    }

    /// One checkbox of the column picker changed.
    pub fn toggle_column(
        &mut self,
        key: &str,
        column_id: &str,
        checked: bool,
    ) -> BrowserResult<ProjectionChange> {
        let candidates = self.dataset_mut(key)?.projection.toggled(column_id, checked);
        self.set_column_visibility(key, &candidates)
    }

    pub fn export_csv(&mut self, key: &str) -> BrowserResult<CsvExport> {
        let dataset = self.dataset_mut(key)?;
        let export = reconcile::export_csv(
            key,
            dataset.projection.visible(),
            dataset.last_result.as_ref(),
        )?;
        info!(dataset = key, bytes = export.content.len(), "csv export ready");
        Ok(export)
    }

    fn dataset_mut(&mut self, key: &str) -> BrowserResult<&mut DatasetSession> {
        let schema = self.registry.get_schema(key)?;
        Ok(self.session.dataset_mut(schema))
    }
}
