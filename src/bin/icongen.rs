//! 命令行入口：从单张源图生成整套 Tauri 图标并写出 `tauri-icons.zip`。

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tauri_icon_generator::error::AppError;
use tauri_icon_generator::icon_generator::{
    parse_resize_filter, GenerationState, GeneratorConfig, IconGenerator, ProgressUpdate,
    DEFAULT_QUALITY, MANIFEST,
};
use tokio::sync::mpsc;

#[derive(Debug, Parser)]
#[command(
    name = "icongen",
    about = "Generate the Tauri icon set (Windows, macOS, iOS, Linux, Android) from one image"
)]
struct Args {
    /// Source image (PNG/JPEG/GIF/SVG...). Only the first file is used.
    #[arg(value_name = "INPUT", required_unless_present = "list")]
    inputs: Vec<PathBuf>,

    /// Directory that receives tauri-icons.zip.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// PNG quality, 1-100.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    quality: u8,

    /// Resize filter: nearest, bilinear, catmullrom, gaussian, lanczos3.
    #[arg(long, default_value = "bilinear")]
    filter: String,

    /// Print the icon manifest and exit.
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error generating icons: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    if args.list {
        for entry in MANIFEST {
            println!(
                "{:<52} {:>4}x{:<4} {:?}",
                entry.output_path, entry.width, entry.height, entry.shape
            );
        }
        return Ok(());
    }

    if args.inputs.is_empty() {
        return Err(AppError::Usage("缺少输入文件".to_string()));
    }

    let mut config = GeneratorConfig::default();
    config.quality = args.quality;
    config.resize_filter = parse_resize_filter(&args.filter)?;

    let generator = Arc::new(IconGenerator::new(config));
    let summary = generator.load_files(&args.inputs)?;
    println!(
        "Loaded {} ({}x{})",
        args.inputs[0].display(),
        summary.width,
        summary.height
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<ProgressUpdate>();
    let printer = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            match update.state {
                GenerationState::Running => {
                    if let Some(path) = &update.output_path {
                        println!("[{:>3}%] {}", update.percent, path);
                    }
                }
                GenerationState::Failed => {
                    if let Some(message) = &update.error_message {
                        log::debug!("generation failed: {}", message);
                    }
                }
                _ => {}
            }
        }
    });

    let result = generator.generate_in_background(tx).await;
    if let Err(err) = printer.await {
        log::warn!("⚠️ 进度输出任务异常结束: {}", err);
    }

    let archive = result?;
    let path = archive.save_to_dir(&args.output)?;
    println!("Wrote {} ({} files)", path.display(), archive.entry_count);
    Ok(())
}
