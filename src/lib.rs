//! AutoGest-Yau: servidor de priorización de trámites municipales.
//!
//! Este crate une los componentes del workspace:
//! - `config`: variables de entorno (.env) a `AppConfig`.
//! - `errors`: errores de arranque (`AppError`) y de API (`ApiError`).
//! - `http`: router axum y handlers.
//! - `bootstrap`: construcción del estado compartido y bucle de servicio.

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod http;

pub use bootstrap::{build_state, serve};
pub use config::AppConfig;
pub use http::{router, AppState};
