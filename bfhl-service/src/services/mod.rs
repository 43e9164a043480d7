pub mod coercion;
pub mod dispatcher;
pub mod math;
pub mod metrics;
pub mod providers;

pub use dispatcher::Dispatcher;
