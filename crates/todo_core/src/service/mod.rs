//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, repository calls and projection per use-case.
//! - Keep HTTP adaptation decoupled from storage details.

pub mod dto;
pub mod todo_service;
