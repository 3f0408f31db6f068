use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use uiseg::detect::resize_by_longest_edge;
use uiseg::ocr::{CommandTextDetector, StaticTextDetector, TextDetector};
use uiseg::pipeline::{export_screenshot, load_image, segment_file, PipelineConfig};
use uiseg::{Category, Platform, Segmenter};

#[derive(Parser, Debug)]
#[command(name = "uiseg")]
#[command(version, about = "GUI screenshot segmentation into components, blocks and text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct OcrArgs {
    /// External OCR program; receives `--image <png>` and prints JSON lines
    #[arg(long)]
    ocr_command: Option<PathBuf>,

    /// Extra argument passed to the OCR program (repeatable)
    #[arg(long = "ocr-arg", allow_hyphen_values = true)]
    ocr_args: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Segment a single screenshot
    Segment {
        /// Input image path
        input: PathBuf,

        /// Output directory (default: ./<input_name>_output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Parameter profile
        #[arg(short, long, value_enum, default_value_t = Platform::Desktop)]
        platform: Platform,

        /// JSON file with parameter overrides
        #[arg(long)]
        params: Option<PathBuf>,

        #[command(flatten)]
        ocr: OcrArgs,

        /// Precomputed OCR lines for this image (JSON)
        #[arg(long, conflicts_with = "ocr_command")]
        ocr_json: Option<PathBuf>,

        /// Enable debug outputs (HTML viewer)
        #[arg(short, long)]
        debug: bool,

        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Segment multiple screenshots
    Batch {
        /// Input image files
        inputs: Vec<PathBuf>,

        /// Output directory for all results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Parameter profile
        #[arg(short, long, value_enum, default_value_t = Platform::Desktop)]
        platform: Platform,

        /// JSON file with parameter overrides
        #[arg(long)]
        params: Option<PathBuf>,

        #[command(flatten)]
        ocr: OcrArgs,

        /// Enable debug outputs
        #[arg(short, long)]
        debug: bool,
    },

    /// Show image size and the effective parameter profile
    Info {
        /// Input image path
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Platform::Desktop)]
        platform: Platform,

        /// JSON file with parameter overrides
        #[arg(long)]
        params: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Segment {
            input,
            output,
            platform,
            params,
            ocr,
            ocr_json,
            debug,
            quiet,
        } => {
            let config = PipelineConfig::new(input.clone(), default_output(&input, output), platform)
                .with_params_file(params)
                .with_debug(debug);
            let detector = match ocr_json {
                Some(path) => Box::new(
                    StaticTextDetector::from_json_file(&path)
                        .with_context(|| format!("Failed to load OCR lines: {}", path.display()))?,
                ) as Box<dyn TextDetector>,
                None => text_detector(&ocr, &config.output),
            };
            let segmenter = build_segmenter(&config, detector)?;
            segment_single(&config, &segmenter, quiet)
        }
        Commands::Batch {
            inputs,
            output,
            platform,
            params,
            ocr,
            debug,
        } => segment_batch(inputs, output, platform, params, ocr, debug),
        Commands::Info {
            input,
            platform,
            params,
        } => show_info(input, platform, params),
    }
}

/// `RUST_LOG` directives when set and valid, `warn` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "screenshot".to_string())
}

fn default_output(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(format!("{}_output", file_stem(input))))
}

fn text_detector(ocr: &OcrArgs, output: &Path) -> Box<dyn TextDetector> {
    match &ocr.ocr_command {
        Some(program) => Box::new(
            CommandTextDetector::new(output.join("ocr"), program.clone())
                .with_args(ocr.ocr_args.clone()),
        ),
        None => {
            warn!("no OCR source configured, detecting components only");
            Box::new(uiseg::ocr::NoTextDetector)
        }
    }
}

fn build_segmenter(config: &PipelineConfig, detector: Box<dyn TextDetector>) -> Result<Segmenter> {
    let params = config.params().with_context(|| {
        format!(
            "Failed to load parameters for profile {}",
            config.platform
        )
    })?;
    Ok(Segmenter::new(params).with_text_detector(detector))
}

fn segment_single(config: &PipelineConfig, segmenter: &Segmenter, quiet: bool) -> Result<()> {
    let input = &config.input;
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    if !quiet {
        println!("[*] Processing: {}", input.display());
        println!("[*] Output: {}", config.output.display());
        println!("[*] Profile: {}", config.platform);
        println!("\n[+] Segmenting screenshot...");
    }

    let screenshot = segment_file(config, segmenter)
        .with_context(|| format!("Failed to process image: {}", input.display()))?;

    if !quiet {
        let segmentation = &screenshot.segmentation;
        println!(
            "[+] Found {} component(s), {} block(s), {} text region(s)",
            segmentation.count(Category::Component),
            segmentation.count(Category::Block),
            segmentation.count(Category::Text)
        );
        println!("[+] Exporting results...");
    }

    export_screenshot(&screenshot, &config.output, config.debug)
        .with_context(|| format!("Failed to export to: {}", config.output.display()))?;

    if !quiet {
        println!("\n[✓] Done! Results saved to: {}", config.output.display());
    }

    Ok(())
}

fn segment_batch(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    platform: Platform,
    params: Option<PathBuf>,
    ocr: OcrArgs,
    debug: bool,
) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }

    let base_output = output.unwrap_or_else(|| PathBuf::from("batch_output"));

    println!("[*] Batch processing {} file(s)", inputs.len());
    println!("[*] Base output: {}\n", base_output.display());

    let base_config = PipelineConfig::new(PathBuf::new(), base_output.clone(), platform)
        .with_params_file(params)
        .with_debug(debug);
    let segmenter = build_segmenter(&base_config, text_detector(&ocr, &base_output))?;

    let mut success = 0;
    let mut failed = 0;

    for (i, input) in inputs.iter().enumerate() {
        println!("[{}/{}] Processing: {}", i + 1, inputs.len(), input.display());

        if !input.exists() {
            eprintln!("  [!] Skipped: file does not exist");
            failed += 1;
            continue;
        }

        let config = PipelineConfig {
            input: input.clone(),
            output: base_output.join(file_stem(input)),
            ..base_config.clone()
        };

        match segment_single(&config, &segmenter, true) {
            Ok(_) => {
                println!("  [✓] Success");
                success += 1;
            }
            Err(e) => {
                eprintln!("  [✗] Failed: {:#}", e);
                failed += 1;
            }
        }
        println!();
    }

    println!("\n[*] Summary: {} succeeded, {} failed", success, failed);

    if failed > 0 {
        anyhow::bail!("{} file(s) failed to process", failed);
    }

    Ok(())
}

fn show_info(input: PathBuf, platform: Platform, params: Option<PathBuf>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let image = load_image(&input)?;
    let config = PipelineConfig::new(input.clone(), PathBuf::new(), platform).with_params_file(params);
    let params = config.params()?;
    let (width, height) = image.dimensions();
    let (work_w, work_h) = resize_by_longest_edge(&image, params.resize).dimensions();

    println!("Screenshot Information");
    println!("======================");
    println!("File: {}", input.display());
    println!("Size: {}x{}", width, height);
    println!("Working resolution: {}x{}", work_w, work_h);
    println!("Profile: {}", platform);
    println!("{}", serde_json::to_string_pretty(&params)?);

    Ok(())
}
