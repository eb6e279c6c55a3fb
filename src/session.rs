use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::comparison::{self, CategoryGroup, Comparison, ComparisonColumn, MIN_SELECTION};
use crate::config::ComparisonConfig;
use crate::error::ComparisonError;
use crate::insights;
use crate::registry::{MetricDefinition, MetricRegistry};
use crate::resolve::Resolver;
use crate::scenario::Scenario;
use crate::types::{MetricCategory, MetricId, ScenarioId, VariantKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Selection,
    Comparison,
}

/// One rendered table row: a visible metric of an expanded category with
/// one value per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub metric: MetricDefinition,
    pub values: Vec<String>,
}

/// Everything a presentation layer reads, recomputed on each call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonView {
    pub columns: Vec<ComparisonColumn>,
    pub categorized_metrics: Vec<CategoryGroup>,
    pub expanded_categories: BTreeSet<MetricCategory>,
    pub insights: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// User-session state for one comparison screen.
///
/// Operations never mutate in place: each takes `&self` and returns the next
/// session, so a rejected operation leaves the caller holding the old one.
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    registry: Arc<MetricRegistry>,
    config: Arc<ComparisonConfig>,
    phase: SessionPhase,
    selected: Vec<Scenario>,
    /// Current comparison, or after `back` the last one, kept so that
    /// re-selecting restores hidden metrics and collapsed categories.
    comparison: Option<Comparison>,
    expanded: BTreeSet<MetricCategory>,
}

impl Default for ComparisonSession {
    fn default() -> Self {
        Self::new(Arc::new(MetricRegistry::canonical()), ComparisonConfig::canonical())
    }
}

impl ComparisonSession {
    pub fn new(registry: Arc<MetricRegistry>, config: ComparisonConfig) -> Self {
        ComparisonSession {
            registry,
            config: Arc::new(config),
            phase: SessionPhase::Selection,
            selected: Vec::new(),
            comparison: None,
            expanded: BTreeSet::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    pub fn selected(&self) -> &[Scenario] {
        &self.selected
    }

    /// The active comparison; `None` while selecting.
    pub fn comparison(&self) -> Option<&Comparison> {
        match self.phase {
            SessionPhase::Comparison => self.comparison.as_ref(),
            SessionPhase::Selection => None,
        }
    }

    pub fn columns(&self) -> &[ComparisonColumn] {
        self.comparison().map(|c| c.columns.as_slice()).unwrap_or(&[])
    }

    /// Expanded categories of the active comparison; empty while selecting.
    pub fn expanded_categories(&self) -> &BTreeSet<MetricCategory> {
        static NONE: BTreeSet<MetricCategory> = BTreeSet::new();
        match self.phase {
            SessionPhase::Comparison => &self.expanded,
            SessionPhase::Selection => &NONE,
        }
    }

    pub fn scenario_types_present(&self) -> BTreeSet<VariantKind> {
        self.selected.iter().map(Scenario::variant).collect()
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry, &self.config.format)
    }

    fn require_comparison(&self) -> Result<&Comparison, ComparisonError> {
        self.comparison().ok_or(ComparisonError::NotComparing)
    }

    /// Enter the comparison for `scenarios`.
    ///
    /// Rejects fewer than two, more than `max_selection`, or a repeated id.
    /// When the same set of scenarios was compared before, metrics hidden
    /// and categories collapsed there stay that way; any other set starts
    /// fresh.
    pub fn select(&self, scenarios: Vec<Scenario>) -> Result<Self, ComparisonError> {
        if self.phase == SessionPhase::Comparison {
            return Err(ComparisonError::AlreadyComparing);
        }
        if scenarios.len() < MIN_SELECTION {
            return Err(ComparisonError::InsufficientSelection { selected: scenarios.len() });
        }
        if scenarios.len() > self.config.max_selection {
            return Err(ComparisonError::SelectionLimitExceeded {
                selected: scenarios.len(),
                max: self.config.max_selection,
            });
        }
        let mut ids = HashSet::new();
        if let Some(dup) = scenarios.iter().find(|s| !ids.insert(&s.id)) {
            return Err(ComparisonError::DuplicateScenario(dup.id.clone()));
        }

        // Customisation carries over only when the same set is picked again.
        let prior = self.comparison.as_ref().filter(|c| {
            let before: HashSet<&ScenarioId> = c.columns.iter().map(|col| col.scenario_id()).collect();
            before == ids
        });
        let prior_columns = prior.map(|c| c.columns.as_slice()).unwrap_or(&[]);
        let built = comparison::build(&scenarios, &self.resolver(), prior_columns)?;

        let collapsed: BTreeSet<MetricCategory> = prior
            .iter()
            .flat_map(|c| c.categorized_metrics.iter().map(|g| g.category))
            .filter(|c| !self.expanded.contains(c))
            .collect();
        let expanded = built
            .categorized_metrics
            .iter()
            .map(|g| g.category)
            .filter(|c| !collapsed.contains(c))
            .collect();

        tracing::debug!(
            scenarios = scenarios.len(),
            collapsed = collapsed.len(),
            "entering comparison"
        );

        Ok(ComparisonSession {
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
            phase: SessionPhase::Comparison,
            selected: scenarios,
            comparison: Some(built),
            expanded,
        })
    }

    /// Flip one metric's visibility in every column at once. A metric that is
    /// not part of the comparison is left alone.
    pub fn toggle_metric_visibility(&self, metric: MetricId) -> Result<Self, ComparisonError> {
        let current = self.require_comparison()?;
        let mut next = self.clone();
        let visible = !current.is_visible(metric);
        if let Some(cmp) = next.comparison.as_mut() {
            for col in &mut cmp.columns {
                if let Some(flag) = col.visibility.get_mut(&metric) {
                    *flag = visible;
                }
            }
        }
        tracing::debug!(%metric, visible, "toggled metric visibility");
        Ok(next)
    }

    /// Flip a category between expanded and collapsed. Visibility flags of
    /// its metrics are not touched.
    pub fn toggle_category_expansion(&self, category: MetricCategory) -> Result<Self, ComparisonError> {
        self.require_comparison()?;
        let mut next = self.clone();
        if !next.expanded.remove(&category) {
            next.expanded.insert(category);
        }
        Ok(next)
    }

    /// Return to selection, remembering customisations for the next `select`.
    pub fn back(&self) -> Self {
        let mut next = self.clone();
        next.phase = SessionPhase::Selection;
        next.selected.clear();
        next
    }

    /// Return to an empty selection, discarding all customisation.
    pub fn reset(&self) -> Self {
        ComparisonSession {
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
            phase: SessionPhase::Selection,
            selected: Vec::new(),
            comparison: None,
            expanded: BTreeSet::new(),
        }
    }

    pub fn insights(&self) -> Vec<String> {
        match self.phase {
            SessionPhase::Comparison => {
                insights::derive_insights(&self.selected, &self.resolver(), &self.config.ranking_metrics)
            }
            SessionPhase::Selection => Vec::new(),
        }
    }

    /// Rows that would be rendered: visible metrics of expanded categories,
    /// in category display order.
    pub fn rows(&self) -> Vec<TableRow> {
        let Some(cmp) = self.comparison() else { return Vec::new() };
        cmp.categorized_metrics
            .iter()
            .filter(|g| self.expanded.contains(&g.category))
            .flat_map(|g| g.metrics.iter())
            .filter(|d| cmp.is_visible(d.id))
            .map(|d| TableRow {
                metric: *d,
                values: cmp
                    .columns
                    .iter()
                    .map(|c| c.value(d.id).unwrap_or(self.config.format.placeholder.as_str()).to_string())
                    .collect(),
            })
            .collect()
    }

    pub fn view(&self) -> Option<ComparisonView> {
        let cmp = self.comparison()?;
        Some(ComparisonView {
            columns: cmp.columns.clone(),
            categorized_metrics: cmp.categorized_metrics.clone(),
            expanded_categories: self.expanded.clone(),
            insights: self.insights(),
            rows: self.rows(),
        })
    }
}
