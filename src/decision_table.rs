use serde::{Deserialize, Serialize};

use crate::finger_pose::{angle_abc, radian_to_degree, ThumbRule};
use crate::types::{
    Digit, FingerState, FingerStates, Hand, ThumbState, INDEX_TIP, PINKY_MCP, THUMB_MCP, THUMB_TIP,
};

/// Umbral del desempate del "siete" (~1.021 rad). Constante calibrada de las
/// fuentes, no derivada.
pub const SEVEN_ANGLE_THRESHOLD_DEG: i32 = 65;

/// Vocabulario activo de dígitos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    /// Solo {1..5}: filas de pulgar doblado 1–4 más la fila abierta del 5.
    Five,
    /// {0..9} completo.
    Ten,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::Ten
    }
}

/// Configuración de la tabla: vocabulario y variante de la prueba del pulgar.
/// Las variantes se representan como valores etiquetados, no como ramas de
/// código duplicadas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub vocabulary: Vocabulary,
    pub thumb_rule: ThumbRule,
}

/// Tabla de decisión dedo-a-dígito. El orden de las reglas es parte del
/// contrato: gana la primera fila que calza.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionTable {
    config: TableConfig,
}

impl DecisionTable {
    pub fn new(config: TableConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Mapea el vector de estados a un dígito, o `None` si ninguna fila calza.
    /// "Sin coincidencia" es un resultado normal, nunca un error: cualquier
    /// dedo `Unknown` cae aquí.
    ///
    /// La mano se recibe junto con los estados porque la fila del siete
    /// desempata con coordenadas crudas (ángulo del pulgar y lateralidad).
    pub fn classify(&self, hand: &Hand, states: &FingerStates) -> Option<Digit> {
        use FingerState::{StraightDown as Down, StraightUp as Up};

        let ten = self.config.vocabulary == Vocabulary::Ten;
        let fingers = (states.index, states.middle, states.ring, states.pinky);

        match states.thumb {
            ThumbState::Open => match fingers {
                (Up, Up, Up, Up) => Some(Digit::Five),
                (Up, Up, Up, Down) if ten => Some(Digit::Nine),
                (Up, Up, Down, Down) if ten => Some(Digit::Eight),
                (Up, Down, Down, Down) if ten && self.seven_tie_break(hand) => Some(Digit::Seven),
                (Down, Down, Down, Down) if ten => Some(Digit::Six),
                _ => None,
            },
            ThumbState::Bent => match fingers {
                (Down, Down, Down, Down) if ten => Some(Digit::Zero),
                (Up, Down, Down, Down) => Some(Digit::One),
                (Up, Up, Down, Down) => Some(Digit::Two),
                (Up, Up, Up, Down) => Some(Digit::Three),
                (Up, Up, Up, Up) => Some(Digit::Four),
                _ => None,
            },
        }
    }

    /// El patrón "solo índice extendido con pulgar abierto" es ambiguo con la
    /// lateralidad: se acepta con ángulo >= 65° (mano derecha), o con la mano
    /// izquierda (x del MCP del pulgar mayor que la del meñique) y ángulo <= 65°.
    fn seven_tie_break(&self, hand: &Hand) -> bool {
        let angle = radian_to_degree(angle_abc(
            hand.landmark(THUMB_TIP),
            hand.landmark(THUMB_MCP),
            hand.landmark(INDEX_TIP),
        ));
        let is_left_hand = hand.landmark(THUMB_MCP).x > hand.landmark(PINKY_MCP).x;

        angle >= SEVEN_ANGLE_THRESHOLD_DEG
            || (is_left_hand && angle <= SEVEN_ANGLE_THRESHOLD_DEG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finger_pose;
    use crate::types::{
        Landmark, INDEX_DIP, INDEX_MCP, INDEX_PIP, MIDDLE_DIP, MIDDLE_MCP, MIDDLE_PIP, MIDDLE_TIP,
        NUM_LANDMARKS, PINKY_DIP, PINKY_PIP, PINKY_TIP, RING_DIP, RING_MCP, RING_PIP, RING_TIP,
        THUMB_CMC, THUMB_IP, WRIST,
    };

    #[derive(Clone, Copy)]
    enum Pose {
        Up,
        Down,
        Unknown,
    }

    /// Construye una mano derecha canónica a partir de poses por dedo.
    /// Columnas x: índice 0.40, medio 0.50, anular 0.60, meñique 0.70.
    fn build_hand(thumb_open: bool, index: Pose, middle: Pose, ring: Pose, pinky: Pose) -> Hand {
        let mut p = [Landmark::default(); NUM_LANDMARKS];
        p[WRIST] = Landmark::new(0.5, 0.9, 0.0);

        p[THUMB_CMC] = Landmark::new(0.38, 0.86, 0.0);
        p[THUMB_MCP] = Landmark::new(0.30, 0.80, 0.0);
        if thumb_open {
            p[THUMB_IP] = Landmark::new(0.24, 0.68, 0.0);
            p[THUMB_TIP] = Landmark::new(0.10, 0.78, 0.0);
        } else {
            p[THUMB_IP] = Landmark::new(0.30, 0.78, 0.0);
            p[THUMB_TIP] = Landmark::new(0.46, 0.70, 0.0);
        }

        let fingers = [
            (index, [INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP], 0.40),
            (middle, [MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP], 0.50),
            (ring, [RING_MCP, RING_PIP, RING_DIP, RING_TIP], 0.60),
            (pinky, [PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP], 0.70),
        ];
        for (pose, [mcp, pip, dip, tip], x) in fingers {
            p[mcp] = Landmark::new(x, 0.70, 0.0);
            match pose {
                Pose::Up => {
                    p[pip] = Landmark::new(x, 0.58, 0.0);
                    p[dip] = Landmark::new(x, 0.46, 0.0);
                    p[tip] = Landmark::new(x, 0.34, 0.0);
                }
                Pose::Down => {
                    p[pip] = Landmark::new(x, 0.74, 0.0);
                    p[dip] = Landmark::new(x, 0.80, 0.0);
                    p[tip] = Landmark::new(x, 0.84, 0.0);
                }
                Pose::Unknown => {
                    p[pip] = Landmark::new(x, 0.40, 0.0);
                    p[dip] = Landmark::new(x, 0.05, 0.0);
                    p[tip] = Landmark::new(x, 0.10, 0.0);
                }
            }
        }

        Hand::from_landmarks(&p).unwrap()
    }

    fn classify(table: &DecisionTable, hand: &Hand) -> Option<Digit> {
        let states = finger_pose::extract(hand, table.config().thumb_rule);
        table.classify(hand, &states)
    }

    fn ten_table() -> DecisionTable {
        DecisionTable::new(TableConfig::default())
    }

    #[test]
    fn canonical_rows_classify_exactly() {
        let table = ten_table();
        let cases = [
            (true, Pose::Up, Pose::Up, Pose::Up, Pose::Up, Digit::Five),
            (true, Pose::Up, Pose::Up, Pose::Up, Pose::Down, Digit::Nine),
            (true, Pose::Up, Pose::Up, Pose::Down, Pose::Down, Digit::Eight),
            (true, Pose::Up, Pose::Down, Pose::Down, Pose::Down, Digit::Seven),
            (true, Pose::Down, Pose::Down, Pose::Down, Pose::Down, Digit::Six),
            (false, Pose::Down, Pose::Down, Pose::Down, Pose::Down, Digit::Zero),
            (false, Pose::Up, Pose::Down, Pose::Down, Pose::Down, Digit::One),
            (false, Pose::Up, Pose::Up, Pose::Down, Pose::Down, Digit::Two),
            (false, Pose::Up, Pose::Up, Pose::Up, Pose::Down, Digit::Three),
            (false, Pose::Up, Pose::Up, Pose::Up, Pose::Up, Digit::Four),
        ];

        for (thumb_open, i, m, r, pk, expected) in cases {
            let hand = build_hand(thumb_open, i, m, r, pk);
            assert_eq!(classify(&table, &hand), Some(expected));
        }
    }

    #[test]
    fn all_up_with_open_thumb_resolves_to_earliest_row() {
        // La fila del cinco va primero entre las de pulgar abierto.
        let table = ten_table();
        let hand = build_hand(true, Pose::Up, Pose::Up, Pose::Up, Pose::Up);
        assert_eq!(classify(&table, &hand), Some(Digit::Five));
    }

    #[test]
    fn unknown_finger_yields_no_match() {
        let table = ten_table();
        let hand = build_hand(true, Pose::Unknown, Pose::Up, Pose::Up, Pose::Up);
        assert_eq!(classify(&table, &hand), None);
    }

    #[test]
    fn seven_requires_angle_threshold_on_right_hand() {
        let table = ten_table();
        let hand = build_hand(true, Pose::Up, Pose::Down, Pose::Down, Pose::Down);

        let states = finger_pose::extract(&hand, ThumbRule::IpToMiddleMcp);
        assert_eq!(states.thumb, ThumbState::Open);
        assert_eq!(table.classify(&hand, &states), Some(Digit::Seven));
    }

    #[test]
    fn seven_mirrors_for_left_hand() {
        // Espejo horizontal: lateralidad invertida y ángulo con signo opuesto.
        let right = build_hand(true, Pose::Up, Pose::Down, Pose::Down, Pose::Down);
        let mirrored: Vec<Landmark> = right
            .landmarks()
            .iter()
            .map(|p| Landmark::new(1.0 - p.x, p.y, p.z))
            .collect();
        let left = Hand::from_landmarks(&mirrored).unwrap();

        assert!(left.landmark(THUMB_MCP).x > left.landmark(PINKY_MCP).x);
        assert_eq!(classify(&ten_table(), &left), Some(Digit::Seven));
    }

    #[test]
    fn five_symbol_vocabulary_is_the_documented_subset() {
        let table = DecisionTable::new(TableConfig {
            vocabulary: Vocabulary::Five,
            thumb_rule: ThumbRule::default(),
        });

        // Las filas 1-4 (pulgar doblado) y el cinco (abierto) sobreviven.
        let four = build_hand(false, Pose::Up, Pose::Up, Pose::Up, Pose::Up);
        let five = build_hand(true, Pose::Up, Pose::Up, Pose::Up, Pose::Up);
        assert_eq!(classify(&table, &four), Some(Digit::Four));
        assert_eq!(classify(&table, &five), Some(Digit::Five));

        // Las filas exclusivas del vocabulario de diez no calzan.
        let zero = build_hand(false, Pose::Down, Pose::Down, Pose::Down, Pose::Down);
        let nine = build_hand(true, Pose::Up, Pose::Up, Pose::Up, Pose::Down);
        assert_eq!(classify(&table, &zero), None);
        assert_eq!(classify(&table, &nine), None);
    }

    #[test]
    fn classification_is_deterministic_for_a_static_hand() {
        let table = ten_table();
        let hand = build_hand(false, Pose::Up, Pose::Up, Pose::Down, Pose::Down);
        assert_eq!(classify(&table, &hand), classify(&table, &hand));
    }

    #[test]
    fn table_config_deserializes_from_snake_case_json() {
        let config: TableConfig =
            serde_json::from_str(r#"{"vocabulary":"five","thumb_rule":"tip_to_index_mcp"}"#)
                .unwrap();
        assert_eq!(config.vocabulary, Vocabulary::Five);
        assert_eq!(config.thumb_rule, ThumbRule::TipToIndexMcp);
    }
}
