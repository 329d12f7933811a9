// Eternal History services
// Services provide the storage core's logic: title encoding, folder paths, queries, highlighting, settings.

pub mod folder_index;
pub mod highlight;
pub mod query_engine;
pub mod settings_engine;
pub mod title_codec;
