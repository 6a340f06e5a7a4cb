use crate::handlers;
use crate::models::{Context, Outcome};
use folio_flags::FlagMap;

/// Flag validation entry point of a handler.
pub type ValidateFn = fn(FlagMap) -> folio_flags::Result<FlagMap>;
/// Main entry point of a handler.
pub type MainFn = fn(&FlagMap, &Context<'_>) -> anyhow::Result<Outcome>;

/// A command: its name, documentation and the two entry points.
#[derive(Debug, Clone, Copy)]
pub struct HandlerDescriptor {
    pub name: &'static str,
    pub docs: &'static str,
    pub validate: ValidateFn,
    pub main: MainFn,
}

impl HandlerDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, docs: &'static str, validate: ValidateFn, main: MainFn) -> Self {
        Self { name, docs, validate, main }
    }

    /// A descriptor is invocable only with a name and non-blank documentation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.name.contains(char::is_whitespace)
            && !self.docs.trim().is_empty()
    }

    /// First non-empty documentation line, without markdown heading markers.
    #[must_use]
    pub fn summary(&self) -> &'static str {
        self.docs
            .lines()
            .map(|line| line.trim().trim_start_matches('#').trim())
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// Explicit table of commands.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    handlers: Vec<HandlerDescriptor>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The commands shipped with the runner.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new()
            .register(handlers::api::descriptor())
            .register(handlers::db::descriptor())
            .register(handlers::docker::descriptor())
            .register(handlers::format::descriptor())
            .register(handlers::lint::descriptor())
            .register(handlers::structure::descriptor())
    }

    /// Adds a handler, keeping the table sorted by name.
    ///
    /// Invalid descriptors and repeated names are skipped with a warning; they never
    /// abort registration. The first registration of a name wins.
    #[must_use]
    pub fn register(mut self, handler: HandlerDescriptor) -> Self {
        if !handler.is_valid() {
            tracing::warn!(command = handler.name, "Skipping handler without a name or documentation");
            return self;
        }
        match self.handlers.binary_search_by(|known| known.name.cmp(handler.name)) {
            Ok(_) => tracing::warn!(command = handler.name, "Skipping duplicate handler registration"),
            Err(at) => self.handlers.insert(at, handler),
        }
        self
    }

    /// Registered handlers sorted by name.
    #[must_use]
    pub fn discover(&self) -> &[HandlerDescriptor] {
        &self.handlers
    }

    /// Looks a command up among the registered handlers.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&HandlerDescriptor> {
        self.handlers
            .binary_search_by(|handler| handler.name.cmp(name))
            .ok()
            .map(|at| &self.handlers[at])
    }

    /// Names of the registered handlers, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.handlers.iter().map(|handler| handler.name.to_owned()).collect()
    }
}
