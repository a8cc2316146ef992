use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decision_table::{TableConfig, Vocabulary};
use crate::finger_pose::ThumbRule;
use crate::gesture_classifier::{landmarks_debug_string, GestureClassifier};
use crate::stabilizer::{ResultStabilizer, COMMIT_INTERVAL_MS};
use crate::types::{CommittedLabel, Frame, FrameLabel};

/// Configuración del motor. Se puede cargar desde un JSON opcional; cualquier
/// campo ausente toma su valor por defecto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub vocabulary: Vocabulary,
    pub thumb_rule: ThumbRule,
    pub commit_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            thumb_rule: ThumbRule::default(),
            commit_interval_ms: COMMIT_INTERVAL_MS,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineConfig {
    /// Carga la configuración desde un archivo JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn table_config(&self) -> TableConfig {
        TableConfig {
            vocabulary: self.vocabulary,
            thumb_rule: self.thumb_rule,
        }
    }
}

/// Resultado de observar un frame: la etiqueta cruda para el "qué veo ahora"
/// y la instantánea comprometida para el "qué quedó confirmado".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub frame_label: FrameLabel,
    pub committed: Option<CommittedLabel>,
    /// true solo cuando esta observación produjo un commit nuevo.
    pub newly_committed: bool,
}

/// Motor de reconocimiento: clasificador puro + estabilizador con estado.
/// El integrador lo llama de forma síncrona desde su bucle de entrega de
/// frames; no hay registro de callbacks ni dependencia de framework.
pub struct RecognitionEngine {
    classifier: GestureClassifier,
    stabilizer: ResultStabilizer,
}

impl RecognitionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            classifier: GestureClassifier::new(config.table_config()),
            stabilizer: ResultStabilizer::new(config.commit_interval_ms),
        }
    }

    /// Procesa un frame. `now_ms` es el tiempo de entrega sobre el reloj
    /// monotónico de la sesión; el temporizador de commit se mide contra él,
    /// no contra el tiempo de procesamiento.
    pub fn observe(&mut self, frame: &Frame, now_ms: u64) -> Observation {
        let frame_label = self.classifier.classify_frame(frame);
        let newly_committed = self.stabilizer.observe(frame_label, now_ms).is_some();

        Observation {
            frame_label,
            committed: self.stabilizer.committed(),
            newly_committed,
        }
    }

    /// Instantánea del resultado comprometido actual.
    pub fn committed(&self) -> Option<CommittedLabel> {
        self.stabilizer.committed()
    }

    /// Reinicio explícito de la sesión.
    pub fn reset(&mut self) {
        self.stabilizer.reset();
    }

    /// Diagnóstico bajo demanda: todos los landmarks del frame más el vector
    /// de estados de dedos de cada mano.
    pub fn diagnostics(&self, frame: &Frame) -> String {
        let mut out = landmarks_debug_string(frame);
        for (hand_idx, states) in self.classifier.finger_states(frame).iter().enumerate() {
            let _ = write!(out, "\n  Estados mano[{}]: {}", hand_idx, states);
        }
        out
    }
}

impl Default for RecognitionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
