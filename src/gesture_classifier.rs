use std::fmt::Write as _;

use crate::decision_table::{DecisionTable, TableConfig};
use crate::finger_pose;
use crate::types::{FingerStates, Frame, FrameLabel};

/// Orquesta extracción de pose + tabla de decisión sobre las manos de un
/// frame. Sin estado entre frames: toda la memoria temporal vive en el
/// estabilizador.
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureClassifier {
    table: DecisionTable,
}

impl GestureClassifier {
    pub fn new(config: TableConfig) -> Self {
        Self {
            table: DecisionTable::new(config),
        }
    }

    pub fn table(&self) -> &DecisionTable {
        &self.table
    }

    /// Etiqueta un frame completo.
    ///
    /// Política explícita de mano única: se recorren las manos en su orden de
    /// llegada y la primera que produce un dígito corta la evaluación; las
    /// manos posteriores no se miran. Una mano sin etiqueta no detiene el
    /// recorrido. Con manos presentes pero ninguna etiquetada, el frame queda
    /// como `Unrecognized`.
    pub fn classify_frame(&self, frame: &Frame) -> FrameLabel {
        if frame.hands.is_empty() {
            return FrameLabel::NoHand;
        }

        for hand in &frame.hands {
            let states = finger_pose::extract(hand, self.table.config().thumb_rule);
            if let Some(digit) = self.table.classify(hand, &states) {
                return FrameLabel::Digit(digit);
            }
        }

        FrameLabel::Unrecognized
    }

    /// Vector de estados de dedos de cada mano del frame, para diagnóstico
    /// del caso "sin gesto".
    pub fn finger_states(&self, frame: &Frame) -> Vec<FingerStates> {
        frame
            .hands
            .iter()
            .map(|hand| finger_pose::extract(hand, self.table.config().thumb_rule))
            .collect()
    }
}

/// Cadena de depuración con todos los landmarks del frame, equivalente al
/// trazado de consola del sistema original.
pub fn landmarks_debug_string(frame: &Frame) -> String {
    if frame.hands.is_empty() {
        return "Sin manos detectadas".to_string();
    }

    let mut out = format!("Manos detectadas: {}\n", frame.hands.len());
    for (hand_idx, hand) in frame.hands.iter().enumerate() {
        let _ = writeln!(
            out,
            "  Mano[{}]: {} landmarks",
            hand_idx,
            hand.landmarks().len()
        );
        for (lm_idx, lm) in hand.landmarks().iter().enumerate() {
            let _ = writeln!(
                out,
                "    [{:2}]: ({:.4}, {:.4}, {:.4})",
                lm_idx, lm.x, lm.y, lm.z
            );
        }
    }
    out
}
