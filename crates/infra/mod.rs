pub mod db;
pub mod token_cache;
