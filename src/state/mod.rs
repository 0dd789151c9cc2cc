//! Application state management module.
//!
//! This module contains the core state management for the application,
//! including:
//! - Main `State` struct that holds all application data
//! - Navigation types (View, Focus, LoginField)
//! - Modal form types (FormState, FormKind)
//! - State error handling

mod error;
mod form;
mod navigation;
mod state_impl;

pub use error::StateError;
pub use form::{FormField, FormKind, FormState};
pub use navigation::{Focus, LoginField, View};
pub use state_impl::{Notification, NotificationKind, PendingDelete, State, PAGE_SIZE};
