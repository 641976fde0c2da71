use std::{fmt, sync::Arc};

use marginalia_core::{
    database::StoreContext,
    domain::{PartialUpdateTranslator, ReadingCatalog, RelationshipMaintainer},
};

use crate::infra::{app_context::AppContext, config::Config};

/// Axum state. Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(config: Config, store: StoreContext) -> Self {
        Self::from_context(AppContext::new(Arc::new(config), store))
    }

    pub fn from_context(context: AppContext) -> Self {
        Self {
            context: Arc::new(context),
        }
    }

    pub fn context(&self) -> &AppContext {
        self.context.as_ref()
    }

    pub fn config(&self) -> &Config {
        self.context.config()
    }

    pub fn store(&self) -> &StoreContext {
        self.context.store()
    }

    pub fn catalog(&self) -> &ReadingCatalog {
        self.context.catalog()
    }

    pub fn relationships(&self) -> &RelationshipMaintainer {
        self.context.relationships()
    }

    pub fn editing(&self) -> &PartialUpdateTranslator {
        self.context.editing()
    }
}
