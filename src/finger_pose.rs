use serde::{Deserialize, Serialize};

use crate::types::{
    FingerState, FingerStates, Hand, Landmark, ThumbState, INDEX_DIP, INDEX_MCP, INDEX_PIP,
    INDEX_TIP, MIDDLE_DIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP, PINKY_DIP, PINKY_MCP, PINKY_PIP,
    PINKY_TIP, RING_DIP, RING_MCP, RING_PIP, RING_TIP, THUMB_IP, THUMB_MCP, THUMB_TIP, WRIST,
};

/// Variante de la prueba del pulgar. Las fuentes del corpus difieren en el
/// punto de referencia contra el que se compara la punta; ambas son válidas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbRule {
    /// Doblado si la punta (4) queda más cerca del MCP del medio (9)
    /// que la articulación IP (3). Variante por defecto.
    IpToMiddleMcp,
    /// Doblado si la punta (4) queda al menos tan cerca del MCP del medio (9)
    /// como del MCP del pulgar (2).
    TipToIndexMcp,
}

impl Default for ThumbRule {
    fn default() -> Self {
        ThumbRule::IpToMiddleMcp
    }
}

/// Distancia euclidiana en el plano XY; la coordenada z se ignora.
pub fn planar_distance(a: Landmark, b: Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Ángulo con signo en el vértice B entre los vectores AB y CB, en radianes.
pub fn angle_abc(a: Landmark, b: Landmark, c: Landmark) -> f32 {
    let ab_x = b.x - a.x;
    let ab_y = b.y - a.y;
    let cb_x = b.x - c.x;
    let cb_y = b.y - c.y;

    let dot = ab_x * cb_x + ab_y * cb_y;
    let cross = ab_x * cb_y - ab_y * cb_x;
    cross.atan2(dot)
}

/// Radianes a grados enteros, redondeando al más cercano (empates hacia arriba).
pub fn radian_to_degree(radian: f32) -> i32 {
    (radian * 180.0 / std::f32::consts::PI + 0.5).floor() as i32
}

/// Estado de un dedo no pulgar a partir de sus cuatro articulaciones.
///
/// Recto hacia arriba: y estrictamente decreciente de la base a la punta
/// (convención de pantalla: y menor = más arriba). Si falla, recogido cuando
/// la punta queda más cerca de la muñeca que la base. Si ninguna aplica, el
/// dedo no aporta información.
fn finger_state(hand: &Hand, tip: usize, dip: usize, pip: usize, mcp: usize) -> FingerState {
    let l = |i: usize| hand.landmark(i);

    if l(tip).y < l(dip).y && l(dip).y < l(pip).y && l(pip).y < l(mcp).y {
        FingerState::StraightUp
    } else if planar_distance(l(tip), l(WRIST)) < planar_distance(l(mcp), l(WRIST)) {
        FingerState::StraightDown
    } else {
        FingerState::Unknown
    }
}

fn thumb_state(hand: &Hand, rule: ThumbRule) -> ThumbState {
    let tip = hand.landmark(THUMB_TIP);
    let palm = hand.landmark(MIDDLE_MCP);

    let bent = match rule {
        ThumbRule::IpToMiddleMcp => {
            planar_distance(tip, palm) < planar_distance(hand.landmark(THUMB_IP), palm)
        }
        ThumbRule::TipToIndexMcp => {
            planar_distance(tip, palm) <= planar_distance(tip, hand.landmark(THUMB_MCP))
        }
    };

    if bent {
        ThumbState::Bent
    } else {
        ThumbState::Open
    }
}

/// Extrae el vector de estados de dedos de una mano. Función pura de la mano:
/// sin estado oculto ni memoria entre frames.
pub fn extract(hand: &Hand, rule: ThumbRule) -> FingerStates {
    FingerStates {
        thumb: thumb_state(hand, rule),
        index: finger_state(hand, INDEX_TIP, INDEX_DIP, INDEX_PIP, INDEX_MCP),
        middle: finger_state(hand, MIDDLE_TIP, MIDDLE_DIP, MIDDLE_PIP, MIDDLE_MCP),
        ring: finger_state(hand, RING_TIP, RING_DIP, RING_PIP, RING_MCP),
        pinky: finger_state(hand, PINKY_TIP, PINKY_DIP, PINKY_PIP, PINKY_MCP),
    }
}
