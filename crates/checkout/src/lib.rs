//! PrintForge checkout workflow library.
//!
//! Client-side workflow for the PrintForge quote service: upload design
//! files, collect server-side price estimates, enter a shipping destination,
//! pick a shipping rate, and create a payment session.
//!
//! The [`workflow::CheckoutWorkflow`] controller owns all flow state and is
//! the only way to mutate it. Every price, dimension, and rate comes from
//! the quote service; the client assembles requests and renders responses.
//!
//! # Example
//!
//! ```rust,ignore
//! use printforge_checkout::config::CheckoutConfig;
//! use printforge_checkout::file::DesignFile;
//! use printforge_checkout::workflow::CheckoutWorkflow;
//!
//! let config = CheckoutConfig::from_env()?;
//! let mut workflow = CheckoutWorkflow::new(&config)?;
//!
//! let file = DesignFile::read("bracket.stl")?;
//! workflow.add_line_item(file).await;
//! workflow.proceed_to_shipping()?;
//! workflow.request_shipping_rates(destination).await?;
//! workflow.select_rate(rate_id)?;
//! let payment_url = workflow.checkout().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod destination;
pub mod error;
pub mod file;
pub mod workflow;

pub use destination::ShippingDestination;
pub use error::WorkflowError;
pub use file::DesignFile;
pub use workflow::{CheckoutWorkflow, Step};
