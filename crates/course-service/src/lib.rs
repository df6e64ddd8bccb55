//! Course marketplace services.
//!
//! This crate ties the catalog, course creation, accounts and the course
//! chat assistant together over the shared database:
//!
//! - [`Catalog`] - filtered browsing and course lookup
//! - [`CourseCreator`] - validated course submission with material uploads
//! - [`CourseAssistant`] - per-course chat grounded in uploaded materials
//! - [`Accounts`] / [`AuthSession`] - registration, sign-in and auth state
//!
//! The assistant's retrieval is substring matching and its embeddings are
//! random vectors; both are placeholders.

pub mod assistant;
pub mod auth;
pub mod catalog;
pub mod context;
pub mod creation;
pub mod error;
pub mod generator;
pub mod training;

pub use assistant::{CourseAssistant, NOT_LOADED_REPLY, PROCESSING_ERROR_REPLY};
pub use auth::{
    Accounts, AuthError, AuthSession, AuthState, AuthSubscription, AuthUser, IdentityProvider,
    InMemoryIdentityProvider, Registration,
};
pub use catalog::{Catalog, CourseFilters};
pub use context::assemble_context;
pub use creation::{
    validate_details, validate_lessons, validate_materials, CourseCreator, CourseDetails,
    CourseDraft, CourseValidationError, MaterialDraft, ValidationPolicy,
};
pub use error::{Result, ServiceError};
pub use generator::{GenerationMode, ResponseGenerator};
pub use training::{TrainingFailure, TrainingReport};
