pub mod database_catalog;
