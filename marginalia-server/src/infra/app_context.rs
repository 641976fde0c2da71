use std::{fmt, sync::Arc};

use marginalia_core::{
    database::StoreContext,
    domain::{PartialUpdateTranslator, ReadingCatalog, RelationshipMaintainer},
};

use crate::infra::config::Config;

/// Long-lived services shared by every request.
#[derive(Clone)]
pub struct AppContext {
    config: Arc<Config>,
    store: StoreContext,
    catalog: Arc<ReadingCatalog>,
    relationships: Arc<RelationshipMaintainer>,
    editing: Arc<PartialUpdateTranslator>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("store", &self.store.backend_name())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    pub fn new(config: Arc<Config>, store: StoreContext) -> Self {
        let unit_of_work = store.unit_of_work();
        Self {
            config,
            catalog: Arc::new(ReadingCatalog::new(&unit_of_work)),
            relationships: Arc::new(RelationshipMaintainer::new(&unit_of_work)),
            editing: Arc::new(PartialUpdateTranslator::new(&unit_of_work)),
            store,
        }
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    pub fn store(&self) -> &StoreContext {
        &self.store
    }

    pub fn catalog(&self) -> &ReadingCatalog {
        self.catalog.as_ref()
    }

    pub fn relationships(&self) -> &RelationshipMaintainer {
        self.relationships.as_ref()
    }

    pub fn editing(&self) -> &PartialUpdateTranslator {
        self.editing.as_ref()
    }
}
