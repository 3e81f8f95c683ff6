use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use relhe::{CodecOptions, PcmAudio, PredictorMode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relhe")]
#[command(version)]
#[command(about = "lhe lossy audio converter", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a WAV file to lhe format
    Encode {
        /// Input WAV file (16-bit mono or stereo)
        input: PathBuf,
        /// Output lhe file
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
        /// Print the PSNR of the quantized signal
        #[arg(long)]
        psnr: bool,
    },
    /// Decode an lhe file to WAV
    Decode {
        /// Input lhe file
        input: PathBuf,
        /// Output WAV file
        output: PathBuf,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Encode and decode a WAV file, printing the PSNR
    Roundtrip {
        /// Input WAV file
        input: PathBuf,
        /// Output WAV file
        output: PathBuf,
        /// Also keep the intermediate lhe file
        #[arg(long)]
        keep: Option<PathBuf>,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Show information about an lhe file
    Info {
        /// Input lhe file
        input: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a preset configuration as JSON
    Config {
        /// Hop levels of the preset (9 or 13)
        #[arg(short, long, default_value = "9")]
        levels: usize,
    },
}

/// Quantizer settings; must match between encode and decode
#[derive(Args)]
struct CodecArgs {
    /// Hop levels (9 or 13)
    #[arg(short, long, default_value = "9")]
    levels: usize,
    /// Predictor for the hop base
    #[arg(short, long, value_enum, default_value = "hold")]
    predictor: PredictorArg,
    /// JSON configuration file (overrides --levels and --predictor)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PredictorArg {
    /// Previous reconstructed sample
    Hold,
    /// Extrapolate from the last two reconstructed samples
    Linear,
}

impl CodecArgs {
    fn options(&self) -> Result<CodecOptions> {
        if let Some(path) = &self.config {
            return CodecOptions::from_config_file(path);
        }
        let predictor = match self.predictor {
            PredictorArg::Hold => PredictorMode::ZeroOrderHold,
            PredictorArg::Linear => PredictorMode::LinearExtrapolation,
        };
        Ok(CodecOptions::with_levels(self.levels)?.with_predictor(predictor))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match cli.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        };
        EnvFilter::from_default_env().add_directive(level.into())
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Encode {
            input,
            output,
            codec,
            psnr,
        } => {
            encode(&input, &output, &codec.options()?, psnr)?;
        }
        Commands::Decode {
            input,
            output,
            codec,
        } => {
            decode(&input, &output, &codec.options()?)?;
        }
        Commands::Roundtrip {
            input,
            output,
            keep,
            codec,
        } => {
            roundtrip(&input, &output, keep.as_deref(), &codec.options()?)?;
        }
        Commands::Info { input, json } => {
            info(&input, json)?;
        }
        Commands::Config { levels } => {
            let options = CodecOptions::with_levels(levels)?;
            let json = options
                .config
                .to_json()
                .context("Failed to serialize config")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn read_input(input: &Path) -> Result<PcmAudio> {
    println!("Reading {}...", input.display());

    let audio = relhe::audio::read_wav(input).context("Failed to read WAV file")?;

    println!("  Sample rate: {} Hz", audio.sample_rate);
    println!("  Channels: {}", audio.channels);
    println!("  Samples: {}", audio.frames());
    println!("  Range: {} to {}", audio.min, audio.max);

    Ok(audio)
}

fn encode(input: &Path, output: &Path, options: &CodecOptions, show_psnr: bool) -> Result<()> {
    let audio = read_input(input)?;

    println!(
        "Encoding to lhe ({} hop levels)...",
        options.config.num_levels
    );

    let (lhe_data, report) =
        relhe::encode_from_samples(&audio, options).context("Failed to encode audio")?;

    fs::write(output, &lhe_data).context("Failed to write output file")?;

    let original_size = audio.samples.len() * 2;
    let ratio = original_size as f64 / lhe_data.len() as f64;

    println!("Done!");
    println!("  Output: {}", output.display());
    println!(
        "  Size: {} bytes ({:.1}x compression)",
        lhe_data.len(),
        ratio
    );
    if show_psnr {
        for (ch, channel) in report.channels.iter().enumerate() {
            println!(
                "  Channel {}: {} symbols, PSNR {}",
                ch, channel.symbols, channel.psnr
            );
        }
        println!("  PSNR: {}", report.psnr);
    }

    Ok(())
}

fn decode(input: &Path, output: &Path, options: &CodecOptions) -> Result<()> {
    println!("Reading {}...", input.display());

    let lhe_data = fs::read(input).context("Failed to read lhe file")?;

    let file_info = relhe::get_lhe_info(&lhe_data).context("Invalid lhe file")?;

    println!("  Channels: {}", file_info.channels);
    println!("  Samples: {}", file_info.sample_count);

    println!("Decoding...");

    let wav_bytes =
        relhe::decode_to_wav(&lhe_data, options).context("Failed to decode lhe file")?;

    println!("Writing WAV...");

    fs::write(output, wav_bytes).context("Failed to write WAV file")?;

    println!("Done!");
    println!("  Output: {}", output.display());

    Ok(())
}

fn roundtrip(
    input: &Path,
    output: &Path,
    keep: Option<&Path>,
    options: &CodecOptions,
) -> Result<()> {
    let audio = read_input(input)?;

    println!("Encoding and decoding...");

    let result = relhe::roundtrip(&audio, options)?;
    debug!(lhe_bytes = result.lhe.len(), "round trip finished");

    if let Some(path) = keep {
        fs::write(path, &result.lhe).context("Failed to write lhe file")?;
        println!("  Kept: {}", path.display());
    }

    fs::write(output, &result.wav).context("Failed to write WAV file")?;

    println!("Done!");
    println!("  Output: {}", output.display());
    println!("  Compressed size: {} bytes", result.lhe.len());
    println!("  PSNR: {}", result.psnr);

    if result.psnr != result.report.psnr {
        bail!(
            "decoded PSNR {} differs from encoder PSNR {}",
            result.psnr,
            result.report.psnr
        );
    }

    Ok(())
}

fn info(input: &Path, json: bool) -> Result<()> {
    let lhe_data = fs::read(input).context("Failed to read lhe file")?;

    let file_info = relhe::get_lhe_info(&lhe_data)?;

    if json {
        let json_str =
            serde_json::to_string_pretty(&file_info).context("Failed to serialize info")?;
        println!("{}", json_str);
        return Ok(());
    }

    println!("lhe Audio File");
    println!("───────────────────────────────");
    println!("  Channels:    {}", file_info.channels);
    println!("  Samples:     {}", file_info.sample_count);
    println!(
        "  Range:       {} to {}",
        file_info.min_sample, file_info.max_sample
    );
    for (ch, symbols) in file_info.symbols.iter().enumerate() {
        println!("  Symbols[{}]:  {}", ch, symbols);
    }
    println!("  Header:      {} bytes", file_info.header_size);
    println!("  Payload:     {} bytes", file_info.payload_size);
    println!("  File size:   {} bytes", file_info.file_size);
    println!("  Compression: {:.1}x", file_info.compression_ratio);
    println!(
        "  Duration:    {:.2}s at {} Hz",
        file_info.duration_secs,
        liblhe_audio::core::OUTPUT_SAMPLE_RATE
    );

    Ok(())
}
