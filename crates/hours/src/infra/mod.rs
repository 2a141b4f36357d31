pub mod db;
pub mod migration;
