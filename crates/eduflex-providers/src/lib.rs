//! eduflex-providers: remote collaborators.
//!
//! HTTP clients for the quiz backend and a Firebase realtime database, plus
//! configuration loading and the factory that wires a `QuizService`.

pub mod backend;
pub mod config;
pub mod error;
pub mod firebase;
pub mod mock;

pub use backend::HttpBackend;
pub use config::{create_service, load_config, load_config_from, EduflexConfig};
pub use error::ProviderError;
pub use firebase::{FirebaseCatalog, FirebaseQuestionBank};
