/*
Reconocimiento de dígitos señalados - Rust puro

Sistema que:
1. Reproduce una grabación CSV de landmarks de mano (21 puntos por mano)
2. Clasifica cada frame con la tabla de decisión dedo-a-dígito
3. Estabiliza el flujo de etiquetas con un intervalo de commit de 2000 ms

Para compilar y ejecutar:
    ./target/release/dactiloscopio grabaciones/cinco.csv
    ./target/release/dactiloscopio --config config.json grabaciones/
*/

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Result};
use crossbeam_channel::bounded;

use dactiloscopio::csv_loader::{load_frames_from_csv, DEFAULT_FRAME_INTERVAL_MS};
use dactiloscopio::engine::{EngineConfig, RecognitionEngine};
use dactiloscopio::types::{Frame, FrameLabel};

struct SessionArgs {
    input: PathBuf,
    config_path: Option<PathBuf>,
}

fn parse_args() -> Result<SessionArgs> {
    let mut input: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config requiere una ruta"))?;
                config_path = Some(PathBuf::from(path));
            }
            _ => {
                if input.is_some() {
                    bail!("Uso: dactiloscopio [--config config.json] <grabación.csv o carpeta>");
                }
                input = Some(PathBuf::from(arg));
            }
        }
    }

    let input = input.ok_or_else(|| anyhow!("Debes especificar una grabación CSV o una carpeta"))?;
    Ok(SessionArgs { input, config_path })
}

/// Si la entrada es una carpeta, elige una grabación CSV al azar dentro de ella.
fn resolve_recording(input: PathBuf) -> Result<PathBuf> {
    if !input.is_dir() {
        return Ok(input);
    }

    let csv_files: Vec<PathBuf> = fs::read_dir(&input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();

    if csv_files.is_empty() {
        bail!("No hay archivos CSV en {:?}", input);
    }

    use rand::Rng;
    let random_idx = rand::thread_rng().gen_range(0..csv_files.len());
    Ok(csv_files[random_idx].clone())
}

fn main() -> Result<()> {
    println!("🖐️  Reconocimiento de dígitos señalados - Rust\n");

    let args = parse_args()?;

    let config = match &args.config_path {
        Some(path) => {
            let config = EngineConfig::from_json_file(path)?;
            println!("⚙️  Configuración cargada desde {:?}", path);
            config
        }
        None => EngineConfig::default(),
    };
    println!(
        "⚙️  Vocabulario: {:?} | Regla del pulgar: {:?} | Commit: {} ms\n",
        config.vocabulary, config.thumb_rule, config.commit_interval_ms
    );

    let csv_path = resolve_recording(args.input)?;
    println!("🎞️  Reproduciendo grabación {:?}", csv_path);

    let frames = load_frames_from_csv(&csv_path, DEFAULT_FRAME_INTERVAL_MS)?;
    println!("✅ {} frames cargados\n", frames.len());

    // Canal acotado: el productor simula la entrega asíncrona del tracker,
    // un frame por tick a la cadencia de captura.
    let (tx, rx) = bounded::<Frame>(100);

    std::thread::spawn(move || {
        let mut previous_ts = 0u64;
        for frame in frames {
            let pause = frame.timestamp_ms.saturating_sub(previous_ts);
            previous_ts = frame.timestamp_ms;
            std::thread::sleep(Duration::from_millis(pause));
            if tx.send(frame).is_err() {
                return;
            }
        }
    });

    println!("🎬 Iniciando reconocimiento...\n");

    let session_start = Instant::now();
    let mut engine = RecognitionEngine::new(config);
    let mut last_label: Option<FrameLabel> = None;

    while let Ok(frame) = rx.recv() {
        let now_ms = session_start.elapsed().as_millis() as u64;
        let observation = engine.observe(&frame, now_ms);

        // Solo se imprime la etiqueta en vivo cuando cambia, para no inundar
        // la consola a la cadencia de frames.
        if last_label != Some(observation.frame_label) {
            println!("👁️  En vivo: {}", observation.frame_label);
            if observation.frame_label == FrameLabel::Unrecognized {
                for line in engine.diagnostics(&frame).lines() {
                    if line.contains("Estados mano") {
                        println!("🔍 {}", line.trim_start());
                    }
                }
            }
            last_label = Some(observation.frame_label);
        }

        if observation.newly_committed {
            let committed = observation.committed.expect("commit recién hecho");
            println!(
                "✅ Resultado confirmado: {} (t={} ms)",
                committed.digit, committed.at_ms
            );
        }
    }

    match engine.committed() {
        Some(committed) => println!(
            "\n🏁 Sesión terminada. Último resultado: {} (t={} ms)",
            committed.digit, committed.at_ms
        ),
        None => println!("\n🏁 Sesión terminada sin resultados confirmados"),
    }

    Ok(())
}
