//! Infrastructure layer: event storage, command dispatch, read models and the
//! order services the HTTP layer calls into.

pub mod catalog;
pub mod command_dispatcher;
pub mod event_store;
pub mod projections;
pub mod read_model;
pub mod services;
pub mod workers;
