//! Application state shared across handlers.

use std::sync::Arc;

use course_service::{
    Accounts, Catalog, CourseAssistant, CourseCreator, IdentityProvider, ResponseGenerator,
};
use database::Database;
use storage::MaterialUploader;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    pub catalog: Catalog,
    pub creator: CourseCreator,
    pub accounts: Accounts,
    /// Shared so chat history and prepared courses survive across requests.
    pub assistant: Arc<CourseAssistant>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        uploader: Arc<dyn MaterialUploader>,
        identity: Arc<dyn IdentityProvider>,
        generator: ResponseGenerator,
    ) -> Self {
        Self {
            catalog: Catalog::new(db.clone()),
            creator: CourseCreator::new(db.clone(), uploader),
            accounts: Accounts::new(db.clone(), identity),
            assistant: Arc::new(CourseAssistant::new(db.clone(), generator)),
            db,
        }
    }
}
