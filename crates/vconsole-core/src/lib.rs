//! vconsole-core: administration console for proof templates and verifier
//! users.
//!
//! Provides:
//! - `table`: generic record table (global filter, single-column sort, pagination)
//! - `models`: typed backend records (templates, schema rows, roles, users)
//! - `forms`: modal form controllers with declarative validation
//! - `api`: verifier REST collaborator (HTTP client, in-memory mock)
//! - `session`: bearer token context
//! - `notify`: transient notices
//! - `pages`: templates and users pages (table + modals + request orchestration)
//! - `view`: UI-agnostic view models
//!
//! With `tui` feature (default):
//! - `tui`: terminal frontend (ratatui/crossterm): state, input, widgets

pub mod api;
pub mod forms;
pub mod models;
pub mod notify;
pub mod pages;
pub mod session;
pub mod table;
pub mod view;

#[cfg(feature = "tui")]
pub mod tui;
