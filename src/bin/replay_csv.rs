use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

use dactiloscopio::csv_loader::{load_frames_from_csv, DEFAULT_FRAME_INTERVAL_MS};
use dactiloscopio::engine::{EngineConfig, RecognitionEngine};
use dactiloscopio::types::FrameLabel;

struct ReplayOptions {
    dump_states: bool,
    config_path: Option<PathBuf>,
}

fn parse_args() -> Result<(PathBuf, ReplayOptions)> {
    let mut dump_states = false;
    let mut config_path: Option<PathBuf> = None;
    let mut csv_path: Option<PathBuf> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dump-states" => dump_states = true,
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config requiere una ruta"))?;
                config_path = Some(PathBuf::from(path));
            }
            _ => {
                if csv_path.is_some() {
                    bail!("Uso: replay_csv [--dump-states] [--config config.json] <grabación.csv>");
                }
                csv_path = Some(PathBuf::from(arg));
            }
        }
    }

    let csv_path = csv_path.ok_or_else(|| anyhow!("Debes especificar una grabación CSV"))?;
    Ok((
        csv_path,
        ReplayOptions {
            dump_states,
            config_path,
        },
    ))
}

fn main() -> Result<()> {
    let (csv_path, opts) = parse_args()?;
    println!("🎞️  Analizando grabación {:?}", csv_path);

    let config = match &opts.config_path {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    let frames = load_frames_from_csv(&csv_path, DEFAULT_FRAME_INTERVAL_MS)?;
    println!("✅ {} frames cargados\n", frames.len());

    // Análisis fuera de línea: el temporizador de commit corre sobre los
    // timestamps de captura de la grabación, no sobre el reloj del proceso.
    let mut engine = RecognitionEngine::new(config);

    let mut no_hand = 0usize;
    let mut unrecognized = 0usize;
    let mut digits = 0usize;

    for (frame_idx, frame) in frames.iter().enumerate() {
        let observation = engine.observe(frame, frame.timestamp_ms);

        match observation.frame_label {
            FrameLabel::NoHand => no_hand += 1,
            FrameLabel::Unrecognized => unrecognized += 1,
            FrameLabel::Digit(_) => digits += 1,
        }

        if observation.newly_committed {
            let committed = observation.committed.expect("commit recién hecho");
            println!(
                "  frame {:>4} (t={:>6} ms): ✅ commit {}",
                frame_idx, committed.at_ms, committed.digit
            );
        }

        if opts.dump_states && observation.frame_label == FrameLabel::Unrecognized {
            println!("\n  frame {:>4}: sin gesto", frame_idx);
            println!("{}\n", engine.diagnostics(frame));
        }
    }

    println!("\n📊 Resumen:");
    println!("  Frames sin manos:   {:>5}", no_hand);
    println!("  Frames sin gesto:   {:>5}", unrecognized);
    println!("  Frames con dígito:  {:>5}", digits);

    match engine.committed() {
        Some(committed) => println!(
            "\n🥇 Último resultado confirmado: {} (t={} ms)",
            committed.digit, committed.at_ms
        ),
        None => println!("\nℹ️  Ningún resultado confirmado en la grabación"),
    }

    Ok(())
}
