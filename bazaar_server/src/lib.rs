//! # Bazaar payment server
//! This crate hosts the HTTP front end for the bazaar payment engine. It is responsible for:
//! Receiving transaction outputs from the wallet-sync process and handing them to the reconciler.
//! Tracking the sales and purchases whose payment addresses the reconciler watches.
//! Logging the notifications the reconciler publishes.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/wallet/outputs`: The wallet callback. Reconciles the outputs of one transaction and returns a report.
//! * `/orders/sale` and `/orders/purchase`: Start tracking a contract.
//! * `/inventory`: Set the on hand quantity for an inventory path.
//! * `/order/{address}`: Fetch the order paying into an address.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
