//! Storefront Core — shared domain abstractions.
//!
//! This crate defines the event model, the handler capability model and the
//! storage collaborator traits that every other crate depends on. It
//! contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod handler;
pub mod model;
pub mod repository;
pub mod rng;
