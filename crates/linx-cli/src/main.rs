use anyhow::{Context, Result};
use clap::Parser;
use linx_core::{resolve_options, run, ScanOptions, DEFAULT_USER_AGENT};
use std::path::PathBuf;
use tracing::{error, info};

const BANNER: &str = r"
   ___
  / (_)__ __ __
 / / / _ \ \ /
/_/_/_//_/_\_\  ";

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "linx", version, about = "Reveals invisible links within JavaScript files")]
struct Cli {
    /// 目标：*.js 文件路径或 URL，多个以逗号分隔
    target: String,

    /// 输出详细调试日志
    #[arg(long)]
    debug: bool,

    /// 输出文件；扩展名选择输出格式（.html 或 .json），为空则不输出
    #[arg(long, default_value = "")]
    output: String,

    /// 多目标时并行扫描
    #[arg(long)]
    parallel: bool,

    /// 并行工作线程上限（默认等于 CPU 核心数）
    #[arg(long)]
    workers: Option<usize>,

    /// 配置文件路径（TOML）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 远程获取时使用的 User-Agent
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    eprintln!("{}{}\n", BANNER, env!("CARGO_PKG_VERSION"));

    let opts = ScanOptions {
        target: cli.target,
        output: cli.output,
        parallel: cli.parallel,
        workers: cli.workers,
        user_agent: cli.user_agent,
        config_path: cli.config,
        ..Default::default()
    };
    let opts = resolve_options(opts).context("load configuration")?;
    info!(target_list = %opts.target, output = %opts.output, parallel = opts.parallel, "starting scan");

    // 扫描阶段的失败只记录日志，不改变进程退出码
    match run(&opts) {
        Ok(stats) => info!(scanned = stats.targets_scanned, failed = stats.targets_failed, findings = stats.findings_total, "done"),
        Err(e) => error!(error = %e, "scan failed"),
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // --debug 强制 debug 级别；否则支持通过 RUST_LOG 控制，默认 info
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
