//! Views.
//!
//! A view read back from a database is known only by name: the provider has
//! no way to recover its defining statement in portable form. Views declared
//! in code carry their statement and dependencies. The two are separate types
//! so that asking a database view for its statement is not expressible.

use serde::{Deserialize, Serialize};

/// A view discovered through database metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseView {
    name: String,
}

impl DatabaseView {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A view declared programmatically, with its full definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredView {
    name: String,
    select_statement: String,
    dependencies: Vec<String>,
}

impl DeclaredView {
    pub fn new(
        name: impl Into<String>,
        select_statement: impl Into<String>,
        dependencies: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            select_statement: select_statement.into(),
            dependencies,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn select_statement(&self) -> &str {
        &self.select_statement
    }

    /// Names of the views this view depends on.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

/// Either kind of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum View {
    Database(DatabaseView),
    Declared(DeclaredView),
}

impl View {
    pub fn name(&self) -> &str {
        match self {
            View::Database(view) => view.name(),
            View::Declared(view) => view.name(),
        }
    }

    pub fn knows_select_statement(&self) -> bool {
        matches!(self, View::Declared(_))
    }

    pub fn knows_dependencies(&self) -> bool {
        matches!(self, View::Declared(_))
    }

    /// The defining statement, if this view was declared in code.
    pub fn select_statement(&self) -> Option<&str> {
        match self {
            View::Database(_) => None,
            View::Declared(view) => Some(view.select_statement()),
        }
    }

    /// Dependencies, if this view was declared in code.
    pub fn dependencies(&self) -> Option<&[String]> {
        match self {
            View::Database(_) => None,
            View::Declared(view) => Some(view.dependencies()),
        }
    }
}

impl From<DatabaseView> for View {
    fn from(view: DatabaseView) -> Self {
        View::Database(view)
    }
}

impl From<DeclaredView> for View {
    fn from(view: DeclaredView) -> Self {
        View::Declared(view)
    }
}
