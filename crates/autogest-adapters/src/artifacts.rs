//! Artifacts pre-entrenados.
//!
//! - Modelo (`modelo_prioridad.json`): red densa congelada
//!   `{format_version, input_dim, layers: [{weights, bias, activation}]}`.
//! - Encoders (`encoders.json`): `{document_types: [...], priorities: [...]}`;
//!   la posición de cada entrada es su código / índice de clase.
//!
//! Al cargar se verifica que modelo y encoders sean compatibles entre sí y
//! con el vector de features del servicio.

use std::fs;
use std::path::{Path, PathBuf};

use autogest_core::encoders::EncoderTables;
use autogest_core::{Classifier, DenseLayer, DenseNetwork, Encoders, FEATURE_DIM};
use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("cannot parse {path}: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("model and encoders are incompatible: {0}")]
    Mismatch(String),
}

/// Forma serializada del modelo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub input_dim: usize,
    pub layers: Vec<DenseLayer>,
}

/// Estado inmutable listo para inyectar en el servicio.
#[derive(Debug)]
pub struct LoadedArtifacts {
    pub classifier: DenseNetwork,
    pub encoders: Encoders,
    /// SHA-256 (hex) de los bytes del archivo de modelo.
    pub model_fingerprint: String,
}

pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| ArtifactError::Io { path: path.to_path_buf(),
                                                        source })
}

pub fn load_model(path: &Path) -> Result<(DenseNetwork, String), ArtifactError> {
    let bytes = read(path)?;
    let artifact: ModelArtifact = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse { path: path.to_path_buf(),
                                                                                                         source })?;
    if artifact.format_version != SUPPORTED_FORMAT_VERSION {
        return Err(ArtifactError::Invalid { path: path.to_path_buf(),
                                            reason: format!("unsupported format_version {}", artifact.format_version) });
    }
    let network = DenseNetwork::new(artifact.input_dim, artifact.layers).map_err(|e| ArtifactError::Invalid { path: path.to_path_buf(),
                                                                                                              reason: e.to_string() })?;
    Ok((network, fingerprint(&bytes)))
}

pub fn load_encoders(path: &Path) -> Result<Encoders, ArtifactError> {
    let bytes = read(path)?;
    let tables: EncoderTables = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse { path: path.to_path_buf(),
                                                                                                       source })?;
    Encoders::from_tables(tables).map_err(|e| ArtifactError::Invalid { path: path.to_path_buf(),
                                                                       reason: e.to_string() })
}

/// Carga modelo y encoders y valida que encajen.
pub fn load_artifacts(model_path: &Path, encoders_path: &Path) -> Result<LoadedArtifacts, ArtifactError> {
    let (classifier, model_fingerprint) = load_model(model_path)?;
    let encoders = load_encoders(encoders_path)?;
    if classifier.input_dim() != FEATURE_DIM {
        return Err(ArtifactError::Mismatch(format!("model expects {} features, service builds {FEATURE_DIM}",
                                                   classifier.input_dim())));
    }
    if classifier.class_count() != encoders.priority_count() {
        return Err(ArtifactError::Mismatch(format!("model outputs {} classes, encoders define {} priorities",
                                                   classifier.class_count(),
                                                   encoders.priority_count())));
    }
    info!("artifacts loaded model={} fingerprint={} document_types={}",
          model_path.display(),
          model_fingerprint,
          encoders.document_types().count());
    Ok(LoadedArtifacts { classifier,
                         encoders,
                         model_fingerprint })
}
