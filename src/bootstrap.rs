//! Arranque: construye una sola vez store, artifacts y notifier y los
//! inyecta en el servicio.

use std::sync::Arc;

use autogest_adapters::{load_artifacts, DisabledNotifier, SmtpNotifier};
use autogest_core::{Notifier, PriorityService};
use autogest_persistence::{build_pool, PoolProvider, SqliteRecordStore};
use log::{info, warn};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::http::{router, AppState};

pub fn build_state(config: &AppConfig) -> Result<AppState, AppError> {
    let pool = build_pool(&config.database.url,
                          config.database.max_connections,
                          config.database.busy_timeout_ms)?;
    info!("database ready url={} max_connections={}", config.database.url, config.database.max_connections);
    let store = SqliteRecordStore::new(PoolProvider { pool });

    let artifacts = load_artifacts(&config.model_path, &config.encoders_path)?;

    let notifier: Arc<dyn Notifier> = match &config.mail {
        Some(mail) => {
            info!("smtp notifier host={} port={} starttls={}", mail.host, mail.port, mail.starttls);
            Arc::new(SmtpNotifier::new(mail)?)
        }
        None => {
            info!("SMTP_HOST no configurado: avisos por correo deshabilitados");
            Arc::new(DisabledNotifier)
        }
    };

    let service = PriorityService::new(Arc::new(artifacts.classifier),
                                       Arc::new(artifacts.encoders),
                                       Arc::new(store),
                                       notifier);
    Ok(AppState::new(service, artifacts.model_fingerprint))
}

/// Atiende hasta recibir Ctrl-C; las peticiones en curso terminan antes de salir.
pub async fn serve(config: &AppConfig, state: AppState) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("autogest-server escuchando en http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal())
                                        .await?;
    info!("autogest-server detenido");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("señal de apagado recibida"),
        Err(e) => {
            warn!("no se pudo instalar el manejador de Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
