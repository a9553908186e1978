pub mod investment_monitor;
pub mod notifier;
pub mod outbox_dispatcher;
