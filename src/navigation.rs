use crate::catalog::{Module, ModuleCatalog};
use std::sync::Arc;

/// Which module the course view is showing.
///
/// Only the active index is stored; every mutation goes through the catalog so
/// the index always refers to a real module. Unknown ids and moves past either
/// end are ignored rather than reported.
#[derive(Debug, Clone)]
pub struct NavigationState {
    catalog: Arc<ModuleCatalog>,
    active: Option<usize>,
}

impl NavigationState {
    /// Starts on the first module, as the viewer does when it mounts.
    pub fn new(catalog: Arc<ModuleCatalog>) -> Self {
        Self {
            catalog,
            active: Some(0),
        }
    }

    #[cfg(test)]
    pub fn without_selection(catalog: Arc<ModuleCatalog>) -> Self {
        Self {
            catalog,
            active: None,
        }
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active().map(|module| module.id.as_str())
    }

    pub fn active(&self) -> Option<&Module> {
        self.active.and_then(|index| self.catalog.get(index))
    }

    pub fn select(&mut self, id: &str) {
        if let Some(index) = self.catalog.index_of(id) {
            self.active = Some(index);
        }
    }

    pub fn next(&mut self) {
        if let Some(index) = self.active {
            if index + 1 < self.catalog.len() {
                self.active = Some(index + 1);
            }
        }
    }

    pub fn previous(&mut self) {
        if let Some(index) = self.active {
            if index > 0 {
                self.active = Some(index - 1);
            }
        }
    }

    pub fn is_first(&self) -> bool {
        self.active == Some(0)
    }

    pub fn is_last(&self) -> bool {
        self.active == Some(self.catalog.len() - 1)
    }

    /// `round(100 * (index + 1) / len)`, or 0 with nothing selected.
    pub fn percent_complete(&self) -> u8 {
        let Some(index) = self.active else {
            return 0;
        };
        let total = self.catalog.len() as f64;
        let percent = (100.0 * (index + 1) as f64 / total).round();
        percent.clamp(0.0, 100.0) as u8
    }
}
