//! # place 文档缩略图工具 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与结果输出。
//! 业务逻辑位于 `thumbnail` 模块，详见 `lib.rs` 架构文档。
//!
//! ```text
//! place-thumb <document> [--size N] [--profile quality|balanced|speed]
//!             [--out FILE.png] [--last-marker] [--json]
//! ```

use std::path::PathBuf;

use serde::Serialize;

use place_thumb::error::AppError;
use place_thumb::thumbnail::{
    DocumentSource, MarkerSearch, RenderedThumbnail, ThumbnailConfig, ThumbnailHandler,
    ThumbnailProfile, encode_png,
};

const DEFAULT_REQUESTED_SIZE: u32 = 256;

const USAGE: &str = "用法: place-thumb <document> [--size N] [--profile quality|balanced|speed] [--out FILE.png] [--last-marker] [--json]";

struct CliArgs {
    input: PathBuf,
    requested_size: u32,
    profile: ThumbnailProfile,
    output: Option<PathBuf>,
    marker_search: MarkerSearch,
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    input: String,
    source: &'a str,
    payload_offset: usize,
    payload_len: usize,
    mime_type: Option<&'a str>,
    native_width: u32,
    native_height: u32,
    width: u32,
    height: u32,
    stride: usize,
    output: Option<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, AppError> {
    let mut input = None;
    let mut requested_size = DEFAULT_REQUESTED_SIZE;
    let mut profile = ThumbnailProfile::Balanced;
    let mut output = None;
    let mut marker_search = MarkerSearch::First;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--size" => {
                let value = args
                    .next()
                    .ok_or_else(|| AppError::Usage("--size 缺少取值".to_string()))?;
                requested_size = value
                    .parse()
                    .map_err(|_| AppError::Usage(format!("--size 不是有效整数：{}", value)))?;
            }
            "--profile" => {
                let value = args
                    .next()
                    .ok_or_else(|| AppError::Usage("--profile 缺少取值".to_string()))?;
                profile = value.parse()?;
            }
            "--out" => {
                let value = args
                    .next()
                    .ok_or_else(|| AppError::Usage("--out 缺少取值".to_string()))?;
                output = Some(PathBuf::from(value));
            }
            "--last-marker" => marker_search = MarkerSearch::Last,
            "--json" => json = true,
            other if other.starts_with("--") => {
                return Err(AppError::Usage(format!("未知参数：{}", other)));
            }
            other => {
                if input.replace(PathBuf::from(other)).is_some() {
                    return Err(AppError::Usage("只能指定一个输入文档".to_string()));
                }
            }
        }
    }

    let input = input.ok_or_else(|| AppError::Usage("缺少输入文档".to_string()))?;

    Ok(CliArgs {
        input,
        requested_size,
        profile,
        output,
        marker_search,
        json,
    })
}

fn run(args: &CliArgs) -> Result<RenderedThumbnail, AppError> {
    let handler = ThumbnailHandler::new(ThumbnailConfig {
        marker_search: args.marker_search,
        ..ThumbnailConfig::default()
    });
    handler.set_profile(args.profile)?;

    let rendered = handler.process(
        DocumentSource::FilePath(args.input.clone()),
        args.requested_size,
    )?;

    if let Some(output) = &args.output {
        let png = encode_png(&rendered.image)?;
        std::fs::write(output, png)?;
        log::info!("💾 缩略图已写入：{}", output.display());
    }

    Ok(rendered)
}

fn print_report(args: &CliArgs, rendered: &RenderedThumbnail) -> Result<(), AppError> {
    if !args.json {
        println!(
            "{}: {}x{} -> {}x{} ({} 字节载荷 @{})",
            args.input.display(),
            rendered.native_width,
            rendered.native_height,
            rendered.image.width(),
            rendered.image.height(),
            rendered.payload_len,
            rendered.payload_offset
        );
        return Ok(());
    }

    let report = Report {
        input: args.input.display().to_string(),
        source: rendered.source_hint,
        payload_offset: rendered.payload_offset,
        payload_len: rendered.payload_len,
        mime_type: rendered.mime_type,
        native_width: rendered.native_width,
        native_height: rendered.native_height,
        width: rendered.image.width(),
        height: rendered.image.height(),
        stride: rendered.image.stride(),
        output: args.output.as_ref().map(|p| p.display().to_string()),
    };
    let text = serde_json::to_string_pretty(&report)
        .map_err(|e| AppError::Usage(format!("序列化报告失败：{}", e)))?;
    println!("{}", text);
    Ok(())
}

fn report_error(error: &AppError, json: bool) {
    log::error!("❌ {}", error);
    if json {
        match serde_json::to_string_pretty(error) {
            Ok(text) => println!("{}", text),
            Err(e) => log::error!("序列化错误信息失败：{}", e),
        }
    } else if matches!(error, AppError::Usage(_)) {
        eprintln!("{}", USAGE);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(error) => {
            report_error(&error, false);
            std::process::exit(error.exit_code());
        }
    };

    let outcome = run(&args).and_then(|rendered| print_report(&args, &rendered));
    if let Err(error) = outcome {
        report_error(&error, args.json);
        std::process::exit(error.exit_code());
    }
}
