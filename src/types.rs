use std::fmt;

use thiserror::Error;

/// Punto 3D normalizado de la malla de la mano.
/// x/y vienen en [0,1] respecto al frame; z es profundidad relativa sin rango fijo.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Número de landmarks por mano en la topología del tracker.
pub const NUM_LANDMARKS: usize = 21;

// Índices de la topología fija. La lógica de decisión está escrita por completo
// en términos de estos índices; romper el orden produce clasificaciones
// equivocadas en silencio, no un crash.
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Mano: exactamente 21 landmarks en la topología fija.
/// Se construye únicamente mediante [`Hand::from_landmarks`], que valida el conteo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hand {
    landmarks: [Landmark; NUM_LANDMARKS],
}

impl Hand {
    /// Valida el contrato de 21 puntos. Un conteo distinto es un error de
    /// programación del colaborador que arma los frames, no una condición
    /// recuperable.
    pub fn from_landmarks(points: &[Landmark]) -> Result<Self, EngineError> {
        if points.len() != NUM_LANDMARKS {
            return Err(EngineError::InvalidLandmarkCount {
                expected: NUM_LANDMARKS,
                actual: points.len(),
            });
        }
        let mut landmarks = [Landmark::default(); NUM_LANDMARKS];
        landmarks.copy_from_slice(points);
        Ok(Self { landmarks })
    }

    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[Landmark; NUM_LANDMARKS] {
        &self.landmarks
    }
}

/// Frame entregado por el tracker externo: cero o más manos y un timestamp
/// de captura monotónico en milisegundos.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub timestamp_ms: u64,
    pub hands: Vec<Hand>,
}

/// Estado derivado de un dedo no pulgar. Se calcula fresco por mano y por
/// frame; nunca se persiste.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerState {
    /// Extendido apuntando fuera de la palma (y decrece de base a punta).
    StraightUp,
    /// Recogido hacia la palma (punta más cerca de la muñeca que la base).
    StraightDown,
    /// Ninguna de las dos pruebas aplica; no aporta a la tabla de decisión.
    Unknown,
}

/// Estado binario del pulgar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbState {
    Open,
    Bent,
}

/// Vector de estados de los cinco dedos de una mano.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerStates {
    pub thumb: ThumbState,
    pub index: FingerState,
    pub middle: FingerState,
    pub ring: FingerState,
    pub pinky: FingerState,
}

impl fmt::Display for FingerStates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pulgar={:?} indice={:?} medio={:?} anular={:?} menique={:?}",
            self.thumb, self.index, self.middle, self.ring, self.pinky
        )
    }
}

/// Dígito del vocabulario de señas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Digit {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
}

impl Digit {
    pub fn as_u8(self) -> u8 {
        match self {
            Digit::Zero => 0,
            Digit::One => 1,
            Digit::Two => 2,
            Digit::Three => 3,
            Digit::Four => 4,
            Digit::Five => 5,
            Digit::Six => 6,
            Digit::Seven => 7,
            Digit::Eight => 8,
            Digit::Nine => 9,
        }
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Etiqueta por frame. `NoHand` y `Unrecognized` son resultados esperados,
/// nunca errores, y no se confunden entre sí en ningún punto del pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLabel {
    NoHand,
    Unrecognized,
    Digit(Digit),
}

impl fmt::Display for FrameLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameLabel::NoHand => write!(f, "sin manos"),
            FrameLabel::Unrecognized => write!(f, "sin gesto"),
            FrameLabel::Digit(d) => write!(f, "{}", d),
        }
    }
}

/// Instantánea del resultado comprometido. Es `Copy` para que una lectura
/// desde otro hilo sea una copia atómica del par completo (digit, at_ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedLabel {
    pub digit: Digit,
    pub at_ms: u64,
}

/// Violaciones del contrato de entrada del motor.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("La mano debe tener {expected} landmarks, recibidos {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },
}
