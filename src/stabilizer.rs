use crate::types::{CommittedLabel, FrameLabel};

/// Intervalo mínimo entre dos commits, en milisegundos. Amortigua el
/// parpadeo mientras una seña todavía se está formando o transicionando.
pub const COMMIT_INTERVAL_MS: u64 = 2000;

/// Estados de la máquina de debounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Aún sin etiqueta comprometida.
    Idle,
    /// Última etiqueta comprometida y su momento de commit.
    Committed(CommittedLabel),
}

/// Estabilizador del flujo de etiquetas por frame.
///
/// Única pieza de estado mutable del núcleo; un solo escritor lógico llama a
/// `observe` por frame entregado. Los timestamps deben venir de un reloj
/// monotónico de sesión, nunca del reloj de pared.
pub struct ResultStabilizer {
    state: State,
    commit_interval_ms: u64,
}

impl ResultStabilizer {
    pub fn new(commit_interval_ms: u64) -> Self {
        Self {
            state: State::Idle,
            commit_interval_ms,
        }
    }

    /// Procesa la etiqueta de un frame con su tiempo de entrega.
    ///
    /// `NoHand` y `Unrecognized` nunca tocan el estado. Un dígito se
    /// compromete si no hay commit previo o si el intervalo de debounce ya
    /// transcurrió (refrescando el timestamp incluso para el mismo dígito);
    /// en caso contrario la observación se descarta.
    ///
    /// Devuelve la instantánea recién comprometida, o `None` si no hubo commit.
    pub fn observe(&mut self, label: FrameLabel, now_ms: u64) -> Option<CommittedLabel> {
        let FrameLabel::Digit(digit) = label else {
            return None;
        };

        let ready = match self.state {
            State::Idle => true,
            State::Committed(prev) => now_ms.saturating_sub(prev.at_ms) >= self.commit_interval_ms,
        };
        if !ready {
            return None;
        }

        let committed = CommittedLabel { digit, at_ms: now_ms };
        self.state = State::Committed(committed);
        Some(committed)
    }

    /// Instantánea del resultado comprometido actual.
    pub fn committed(&self) -> Option<CommittedLabel> {
        match self.state {
            State::Idle => None,
            State::Committed(label) => Some(label),
        }
    }

    /// Reinicio explícito (nueva sesión). Nunca ocurre de forma implícita.
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}

impl Default for ResultStabilizer {
    fn default() -> Self {
        Self::new(COMMIT_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Digit;

    #[test]
    fn first_digit_commits_immediately() {
        let mut stab = ResultStabilizer::default();
        let committed = stab.observe(FrameLabel::Digit(Digit::Three), 0).unwrap();
        assert_eq!(committed.digit, Digit::Three);
        assert_eq!(committed.at_ms, 0);
    }

    #[test]
    fn debounce_blocks_early_digit_and_admits_late_one() {
        let mut stab = ResultStabilizer::default();
        stab.observe(FrameLabel::Digit(Digit::Three), 0);

        // A los 500 ms el intervalo no ha transcurrido: se descarta.
        assert!(stab.observe(FrameLabel::Digit(Digit::Seven), 500).is_none());
        assert_eq!(stab.committed().unwrap().digit, Digit::Three);

        // A los 2001 ms sí.
        let committed = stab.observe(FrameLabel::Digit(Digit::Seven), 2001).unwrap();
        assert_eq!(committed.digit, Digit::Seven);
        assert_eq!(stab.committed().unwrap().at_ms, 2001);
    }

    #[test]
    fn noise_sequence_commits_exactly_once() {
        let mut stab = ResultStabilizer::default();
        let sequence = [
            (FrameLabel::NoHand, 0),
            (FrameLabel::Digit(Digit::Two), 100),
            (FrameLabel::Unrecognized, 200),
            (FrameLabel::Digit(Digit::Two), 300),
        ];

        let mut commits = 0;
        for (label, t) in sequence {
            if stab.observe(label, t).is_some() {
                commits += 1;
            }
        }

        assert_eq!(commits, 1);
        let committed = stab.committed().unwrap();
        assert_eq!(committed.digit, Digit::Two);
        assert_eq!(committed.at_ms, 100);
    }

    #[test]
    fn no_hand_and_unrecognized_never_touch_state() {
        let mut stab = ResultStabilizer::default();
        assert!(stab.observe(FrameLabel::NoHand, 0).is_none());
        assert!(stab.observe(FrameLabel::Unrecognized, 50).is_none());
        assert!(stab.committed().is_none());

        stab.observe(FrameLabel::Digit(Digit::Nine), 100);
        stab.observe(FrameLabel::NoHand, 150);
        assert_eq!(stab.committed().unwrap().digit, Digit::Nine);
    }

    #[test]
    fn same_digit_recommit_refreshes_timestamp() {
        let mut stab = ResultStabilizer::default();
        stab.observe(FrameLabel::Digit(Digit::Four), 0);
        let again = stab.observe(FrameLabel::Digit(Digit::Four), 2500).unwrap();
        assert_eq!(again.at_ms, 2500);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut stab = ResultStabilizer::default();
        stab.observe(FrameLabel::Digit(Digit::One), 0);
        stab.reset();
        assert!(stab.committed().is_none());

        // Tras el reinicio el siguiente dígito compromete sin esperar.
        let committed = stab.observe(FrameLabel::Digit(Digit::Five), 10).unwrap();
        assert_eq!(committed.digit, Digit::Five);
    }
}
