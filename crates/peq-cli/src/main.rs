//! peq - Parametric EQ host
//!
//! Usage:
//!   peq                                   - print the default response curve
//!   peq --set 1:1000:6:1                  - drag stage 1 to 1 kHz, +6 dB, Q 1
//!   peq --set 0:80:-3 --render-tone 80    - measure the rendered gain at 80 Hz
//!   peq --config eq.json --format json    - load settings, emit JSON

use std::f64::consts::{PI, SQRT_2};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use peq_core::{EqConfig, ParamRange, Sample};
use peq_dsp::{FilterStage, FrequencyGrid, ResponseCurve};
use peq_engine::{BiquadEngine, BiquadRenderer, EqPoint, EqSession, StageEdit};

const BLOCK_SIZE: usize = 256;

/// Highest engine rate accepted; bounds the tone render buffer
const MAX_SAMPLE_RATE: f64 = 768_000.0;

#[derive(Parser)]
#[command(name = "peq", about = "Parametric EQ response and render check")]
struct Cli {
    /// JSON config file (defaults are used when absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample rate of the in-process engine
    #[arg(short = 'r', long, default_value_t = 48000.0, value_parser = parse_sample_rate)]
    sample_rate: f64,

    /// Stage edit, applied as a drag gesture ending in a commit
    #[arg(short = 's', long = "set", value_name = "INDEX:FREQ:GAIN[:Q]", value_parser = parse_edit)]
    edits: Vec<EditArg>,

    /// Transient updates issued per drag before the commit
    #[arg(long, default_value_t = 8)]
    drag_steps: usize,

    /// Render a sine at this frequency and report the measured gain
    #[arg(long, value_name = "HZ")]
    render_tone: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Print every n-th grid point in table output
    #[arg(long, default_value_t = 32)]
    every: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy)]
struct EditArg {
    index: usize,
    frequency_hz: f64,
    gain_db: f64,
    q: Option<f64>,
}

fn parse_sample_rate(arg: &str) -> Result<f64, String> {
    let rate: f64 = arg
        .trim()
        .parse()
        .map_err(|e| format!("invalid sample rate '{arg}': {e}"))?;
    if !rate.is_finite() || rate <= 0.0 || rate > MAX_SAMPLE_RATE {
        return Err(format!("sample rate must lie in (0, {MAX_SAMPLE_RATE}] Hz, got {rate}"));
    }
    Ok(rate)
}

fn parse_edit(arg: &str) -> Result<EditArg, String> {
    let parts: Vec<&str> = arg.split(':').collect();
    if !(3..=4).contains(&parts.len()) {
        return Err(format!("expected INDEX:FREQ:GAIN[:Q], got '{arg}'"));
    }
    let number = |s: &str, what: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid {what} '{s}': {e}"))
    };

    Ok(EditArg {
        index: parts[0]
            .trim()
            .parse()
            .map_err(|e| format!("invalid index '{}': {e}", parts[0]))?,
        frequency_hz: number(parts[1], "frequency")?,
        gain_db: number(parts[2], "gain")?,
        q: parts.get(3).map(|&s| number(s, "q")).transpose()?,
    })
}

#[derive(Serialize)]
struct ToneReport {
    frequency_hz: f64,
    measured_db: f64,
    predicted_db: f64,
}

#[derive(Serialize)]
struct Report<'a> {
    sample_rate: f64,
    #[serde(skip)]
    grid: &'a FrequencyGrid,
    stages: &'a [FilterStage],
    points: &'a [EqPoint],
    curve: &'a ResponseCurve,
    #[serde(skip_serializing_if = "Option::is_none")]
    tone: Option<ToneReport>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EqConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EqConfig::default(),
    };

    let mut session = EqSession::new(&config)?;
    let (engine, mut renderer) = BiquadEngine::new(cli.sample_rate, config.queue_capacity);
    session.bind(engine).context("failed to bind audio engine")?;

    for edit in &cli.edits {
        drag(&mut session, &mut renderer, edit, cli.drag_steps)
            .with_context(|| format!("edit of stage {} failed", edit.index))?;
    }

    let curve = session.compute_response()?;
    let tone = match cli.render_tone {
        Some(hz) => Some(measure_tone(&session, &mut renderer, hz)?),
        None => None,
    };

    let report = Report {
        sample_rate: cli.sample_rate,
        grid: session.grid(),
        stages: session.stages(),
        points: session.points(),
        curve: &curve,
        tone,
    };
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_table(&report, cli.every.max(1)),
    }
    Ok(())
}

/// Move a stage to its target as an interactive drag would: a run of
/// transient updates with the audio thread rendering in between, then a
/// single commit.
fn drag(
    session: &mut EqSession<BiquadEngine>,
    renderer: &mut BiquadRenderer,
    edit: &EditArg,
    steps: usize,
) -> Result<()> {
    let start = *session.stage(edit.index)?;
    // A drag cannot leave the axis, so the path ends at the clamped target
    let target_hz = ParamRange::FREQUENCY.clamp(edit.frequency_hz);
    let mut scratch = [0.0; BLOCK_SIZE];

    for step in 1..=steps {
        let t = step as f64 / (steps + 1) as f64;
        // Frequency moves on the log axis the UI draws
        let freq = start.frequency_hz * (target_hz / start.frequency_hz).powf(t);
        let gain = start.gain_db + (edit.gain_db - start.gain_db) * t;
        session.update_parameter(edit.index, StageEdit::new().frequency(freq).gain(gain), false)?;
        renderer.process_block(&mut scratch);
    }

    let mut target = StageEdit::new().frequency(edit.frequency_hz).gain(edit.gain_db);
    if let Some(q) = edit.q {
        target = target.q(q);
    }
    let stage = session.update_parameter(edit.index, target, true)?;
    log::info!(
        "Stage {} committed: {:.1} Hz, {:+.2} dB, Q {:.3}",
        edit.index,
        stage.frequency_hz,
        stage.gain_db,
        stage.q
    );
    Ok(())
}

/// Render one second of settling plus one second of measurement
fn measure_tone(
    session: &EqSession<BiquadEngine>,
    renderer: &mut BiquadRenderer,
    frequency_hz: f64,
) -> Result<ToneReport> {
    let Some(sample_rate) = session.sample_rate() else {
        bail!("no audio graph bound");
    };
    if sample_rate > MAX_SAMPLE_RATE {
        bail!("sample rate {sample_rate} Hz above {MAX_SAMPLE_RATE} Hz");
    }
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 || frequency_hz >= sample_rate / 2.0 {
        bail!("tone frequency {frequency_hz} Hz must lie in (0, {})", sample_rate / 2.0);
    }

    let len = sample_rate as usize;
    let mut signal: Vec<Sample> = (0..2 * len)
        .map(|i| (2.0 * PI * frequency_hz * i as f64 / sample_rate).sin())
        .collect();
    for block in signal.chunks_mut(BLOCK_SIZE) {
        renderer.process_block(block);
    }

    let tail = &signal[len..];
    let rms = (tail.iter().map(|x| x * x).sum::<f64>() / tail.len() as f64).sqrt();
    let predicted_db = session
        .stages()
        .iter()
        .map(|s| s.coefficients(sample_rate).magnitude_db_at(frequency_hz, sample_rate))
        .sum::<f64>();

    Ok(ToneReport {
        frequency_hz,
        measured_db: 20.0 * (rms * SQRT_2).log10(),
        predicted_db,
    })
}

fn print_table(report: &Report<'_>, every: usize) {
    println!("Sample rate: {} Hz", report.sample_rate);
    println!(
        "Grid: {} points, {:.1} - {:.1} Hz",
        report.grid.len(),
        report.grid.min_hz(),
        report.grid.max_hz()
    );
    println!();
    println!("{:>5} {:>10} {:>8} {:>8}", "stage", "freq Hz", "gain dB", "Q");
    for (i, stage) in report.stages.iter().enumerate() {
        println!(
            "{:>5} {:>10.1} {:>+8.2} {:>8.3}",
            i, stage.frequency_hz, stage.gain_db, stage.q
        );
    }

    println!();
    println!("{:>10} {:>9}", "freq Hz", "dB");
    let last = report.curve.len().saturating_sub(1);
    for (i, (hz, db)) in report.curve.iter().enumerate() {
        if i % every == 0 || i == last {
            println!("{:>10.1} {:>+9.3}", hz, db);
        }
    }

    if let Some((hz, db)) = report.curve.peak() {
        println!();
        println!("Peak: {:+.3} dB at {:.1} Hz", db, hz);
    }
    if let Some(tone) = &report.tone {
        println!(
            "Tone {:.1} Hz: measured {:+.3} dB, predicted {:+.3} dB",
            tone.frequency_hz, tone.measured_db, tone.predicted_db
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit() {
        let edit = parse_edit("1:1000:6").unwrap();
        assert_eq!(edit.index, 1);
        assert_eq!(edit.frequency_hz, 1000.0);
        assert_eq!(edit.gain_db, 6.0);
        assert_eq!(edit.q, None);

        let edit = parse_edit("3:8000:-4.5:0.7").unwrap();
        assert_eq!(edit.q, Some(0.7));

        assert!(parse_edit("1:1000").is_err());
        assert!(parse_edit("x:1000:6").is_err());
        assert!(parse_edit("1:1000:6:1:2").is_err());
        assert!(parse_edit("1:abc:6").is_err());
    }

    #[test]
    fn test_drag_commits_target() {
        let mut session: EqSession<BiquadEngine> = EqSession::new(&EqConfig::default()).unwrap();
        let (engine, mut renderer) = BiquadEngine::new(48000.0, 4);
        session.bind(engine).unwrap();

        let edit = parse_edit("1:2000:6:1").unwrap();
        drag(&mut session, &mut renderer, &edit, 16).unwrap();

        let stage = session.stage(1).unwrap();
        assert_eq!((stage.frequency_hz, stage.gain_db, stage.q), (2000.0, 6.0, 1.0));
        assert_eq!(session.points()[1], EqPoint { x: 2000.0, y: 6.0 });
    }

    #[test]
    fn test_tone_matches_prediction() {
        let mut session: EqSession<BiquadEngine> = EqSession::new(&EqConfig::default()).unwrap();
        let (engine, mut renderer) = BiquadEngine::new(48000.0, 64);
        session.bind(engine).unwrap();
        drag(&mut session, &mut renderer, &parse_edit("1:1000:6:1").unwrap(), 4).unwrap();

        let tone = measure_tone(&session, &mut renderer, 1000.0).unwrap();
        assert!((tone.measured_db - tone.predicted_db).abs() < 0.05);
        assert!(measure_tone(&session, &mut renderer, 30000.0).is_err());
    }

    #[test]
    fn test_drag_clamps_unreachable_target() {
        let mut session: EqSession<BiquadEngine> = EqSession::new(&EqConfig::default()).unwrap();
        let (engine, mut renderer) = BiquadEngine::new(48000.0, 4);
        session.bind(engine).unwrap();

        drag(&mut session, &mut renderer, &parse_edit("0:-100:6").unwrap(), 8).unwrap();
        let stage = session.stage(0).unwrap();
        assert_eq!((stage.frequency_hz, stage.gain_db), (20.0, 6.0));
        assert_eq!(session.points()[0], EqPoint { x: 20.0, y: 6.0 });

        drag(&mut session, &mut renderer, &parse_edit("0:0:6").unwrap(), 8).unwrap();
        assert_eq!(session.stage(0).unwrap().frequency_hz, 20.0);
    }

    #[test]
    fn test_parse_sample_rate() {
        assert_eq!(parse_sample_rate("44100").unwrap(), 44100.0);
        assert_eq!(parse_sample_rate("768000").unwrap(), MAX_SAMPLE_RATE);
        assert!(parse_sample_rate("0").is_err());
        assert!(parse_sample_rate("-48000").is_err());
        assert!(parse_sample_rate("1e300").is_err());
        assert!(parse_sample_rate("inf").is_err());
        assert!(parse_sample_rate("NaN").is_err());
        assert!(parse_sample_rate("fast").is_err());

        assert!(Cli::try_parse_from(["peq", "--sample-rate", "1e18"]).is_err());
        let cli = Cli::try_parse_from(["peq", "-r", "96000"]).unwrap();
        assert_eq!(cli.sample_rate, 96000.0);
    }

    #[test]
    fn test_tone_rejects_oversized_rate() {
        let mut session: EqSession<BiquadEngine> = EqSession::new(&EqConfig::default()).unwrap();
        let (engine, mut renderer) = BiquadEngine::new(1e18, 4);
        session.bind(engine).unwrap();
        assert!(measure_tone(&session, &mut renderer, 1000.0).is_err());
    }
}
