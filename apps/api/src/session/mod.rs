// Session-scoped state: the in-memory store, the registry that owns one store per
// session, and the JSON export/import of the persisted part.

pub mod handlers;
pub mod registry;
pub mod snapshot;
pub mod store;
