//! Clasificador congelado: vector de features → distribución de probabilidad.
//!
//! El modelo se carga desde un artifact pre-entrenado; aquí no se entrena nada.

mod dense;

pub use dense::{Activation, DenseLayer, DenseNetwork};

use crate::errors::ClassifierError;

/// Contrato de inferencia. Una llamada por solicitud, sin batching.
pub trait Classifier: Send + Sync {
    /// Dimensión esperada del vector de entrada.
    fn input_dim(&self) -> usize;
    /// Número de clases de salida.
    fn class_count(&self) -> usize;
    /// Devuelve una probabilidad por clase (mismo orden que el encoder de prioridad).
    fn predict_proba(&self, features: &[f32]) -> Result<Vec<f32>, ClassifierError>;
}

/// Índice de la clase con mayor probabilidad.
///
/// Empates: gana el índice más bajo. Devuelve `None` si el vector está vacío o
/// contiene valores no finitos.
pub fn argmax_first(probs: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &p) in probs.iter().enumerate() {
        if !p.is_finite() {
            return None;
        }
        match best {
            Some((_, top)) if p <= top => {}
            _ => best = Some((idx, p)),
        }
    }
    best.map(|(idx, _)| idx)
}
