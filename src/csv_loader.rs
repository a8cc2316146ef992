use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, ensure, Context, Result};
use csv::ReaderBuilder;

use crate::types::{Frame, Hand, Landmark, NUM_LANDMARKS};

/// Intervalo sintetizado entre frames al reproducir una grabación (~30 fps,
/// la tasa de la cámara del sistema original).
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 33;

/// Carga una secuencia de Frames desde un CSV en el formato
/// frame,hand,landmark,x,y,z ordenado por frame, mano y landmark.
///
/// Un índice de frame sin filas representa un frame sin manos (hueco de
/// detección); se conserva como tal, no se rellena. Los timestamps de captura
/// se sintetizan a partir del índice y el intervalo dado.
pub fn load_frames_from_csv(path: impl AsRef<Path>, frame_interval_ms: u64) -> Result<Vec<Frame>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;

    // frame -> mano -> landmarks parciales
    let mut samples: BTreeMap<usize, BTreeMap<usize, Vec<Option<Landmark>>>> = BTreeMap::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record =
            result.with_context(|| format!("Fila {} inválida en {:?}", row_idx + 1, path))?;
        if record.len() < 6 {
            bail!("La fila {} no tiene 6 columnas", row_idx + 1);
        }

        let frame: usize = record[0]
            .parse()
            .with_context(|| format!("frame inválido en fila {}", row_idx + 1))?;
        let hand: usize = record[1]
            .parse()
            .with_context(|| format!("hand inválido en fila {}", row_idx + 1))?;
        let landmark: usize = record[2]
            .parse()
            .with_context(|| format!("landmark inválido en fila {}", row_idx + 1))?;

        if landmark >= NUM_LANDMARKS {
            bail!("Landmark {} fuera de rango (fila {})", landmark, row_idx + 1);
        }

        let x: f32 = record[3].parse()?;
        let y: f32 = record[4].parse()?;
        let z: f32 = record[5].parse()?;

        let points = samples
            .entry(frame)
            .or_default()
            .entry(hand)
            .or_insert_with(|| vec![None; NUM_LANDMARKS]);
        points[landmark] = Some(Landmark::new(x, y, z));
    }

    if samples.is_empty() {
        return Err(anyhow!("El CSV {:?} no contiene datos", path));
    }

    let max_frame = *samples.keys().max().unwrap();

    let mut frames = Vec::with_capacity(max_frame + 1);
    for frame_idx in 0..=max_frame {
        let mut hands = Vec::new();
        if let Some(hand_map) = samples.get(&frame_idx) {
            for (hand_idx, points) in hand_map {
                let complete: Vec<Landmark> = points.iter().flatten().copied().collect();
                ensure!(
                    complete.len() == NUM_LANDMARKS,
                    "La mano {} del frame {} tiene {} de {} landmarks",
                    hand_idx,
                    frame_idx,
                    complete.len(),
                    NUM_LANDMARKS
                );
                hands.push(Hand::from_landmarks(&complete)?);
            }
        }
        frames.push(Frame {
            timestamp_ms: frame_idx as u64 * frame_interval_ms,
            hands,
        });
    }

    Ok(frames)
}

/// Escribe una secuencia de frames en el mismo formato que lee
/// [`load_frames_from_csv`], para grabar sesiones reproducibles.
pub fn write_frames_to_csv(path: impl AsRef<Path>, frames: &[Frame]) -> Result<()> {
    let path = path.as_ref();
    let mut file =
        File::create(path).with_context(|| format!("No se pudo crear el CSV {:?}", path))?;

    writeln!(file, "frame,hand,landmark,x,y,z")?;
    for (frame_idx, frame) in frames.iter().enumerate() {
        for (hand_idx, hand) in frame.hands.iter().enumerate() {
            for (lm_idx, lm) in hand.landmarks().iter().enumerate() {
                writeln!(
                    file,
                    "{},{},{},{},{},{}",
                    frame_idx, hand_idx, lm_idx, lm.x, lm.y, lm.z
                )?;
            }
        }
    }

    Ok(())
}
