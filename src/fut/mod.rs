//! FUT (Formulario Único de Trámite) requests: data model, request-number
//! rule, validation, the in-memory registry and its HTTP endpoints.

pub mod display;
pub mod filter;
pub mod handlers;
pub mod model;
pub mod multipart_parser;
pub mod number;
pub mod registry;
pub mod validation;

pub use handlers::config;
pub use registry::{FutRegistry, FutService, RegistryError, StudentService};
