pub mod browse;
pub mod record_view;
