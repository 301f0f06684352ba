//! # AnalystTrack - Stock Prediction Tracker
//!
//! A terminal client where analysts sign up, submit price-target
//! predictions for stocks, and browse each other's track records.
//! Built with ratatui over a pluggable document store and identity
//! provider.
//!
//! ## Architecture
//!
//! The application follows a clean architecture pattern:
//!
//! - **App**: Core application state and lifecycle management
//! - **UI**: Layout and rendering logic
//! - **Backend**: Document store and identity provider seams, plus an
//!   in-process implementation
//! - **Model**: Stored records and form validation
//! - **Services**: Session, analyst directory and prediction ledger
//! - **State**: Centralized state management
//! - **Events**: Input handling and event processing
//! - **Config**: Configuration management

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod services;
pub mod state;
pub mod ui;

pub use app::App;
pub use backend::{DocumentStore, IdentityProvider, LocalBackend, Subscription};
pub use config::Config;
pub use error::{Error, Result};
pub use services::Services;
