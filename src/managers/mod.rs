// Eternal History state managers
// Managers own stored state: history records in the folder tree, saved queries.

pub mod record_store;
pub mod saved_query_manager;
