pub mod enums;
pub mod executions;
pub mod stream_events;
pub mod uploads;
pub mod viewer;
