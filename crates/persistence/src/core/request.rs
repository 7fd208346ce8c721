//! Rendering whole queries into native requests.

use serde::{Deserialize, Serialize};

use tessera_model::{DeleteQuery, SelectQuery};

use super::backend::BackendKind;
use crate::error::TranslationResult;

/// Renders select and delete queries into a backend's native requests.
///
/// Implementations are stateless apart from their configuration and never
/// perform I/O. Rendering is all-or-nothing: any unsupported part of the
/// query fails the whole call.
pub trait QueryTranslator: Send + Sync {
    /// The native select request.
    type Request: Serialize;

    /// The native delete request.
    type DeleteRequest: Serialize;

    /// Returns the backend this translator renders for.
    fn kind(&self) -> BackendKind;

    /// Renders a select query.
    fn select(&self, query: &SelectQuery) -> TranslationResult<Self::Request>;

    /// Renders a delete query.
    fn delete(&self, query: &DeleteQuery) -> TranslationResult<Self::DeleteRequest>;
}

/// A select or delete query, as loaded from a JSON query document.
///
/// ```json
/// {"select": {"target": "person", "condition": {"eq": {"name": "name", "value": "Ada"}}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryDocument {
    Select(SelectQuery),
    Delete(DeleteQuery),
}

impl QueryDocument {
    /// The target entity name.
    pub fn target(&self) -> &str {
        match self {
            QueryDocument::Select(query) => query.target(),
            QueryDocument::Delete(query) => query.target(),
        }
    }
}

impl From<SelectQuery> for QueryDocument {
    fn from(query: SelectQuery) -> Self {
        QueryDocument::Select(query)
    }
}

impl From<DeleteQuery> for QueryDocument {
    fn from(query: DeleteQuery) -> Self {
        QueryDocument::Delete(query)
    }
}
