//! 扫描主流程与并行调度
use crate::error::ScanError;
use crate::options::{ScanOptions, ScanStats};
use crate::patterns::PatternEngine;
use crate::pipeline::extract;
use crate::report::Reporter;
use crate::source::{ContentSource, DefaultSource};
use crate::target::{resolve_targets, ScanTask};
use crate::types::ResultSet;

/// 按选项执行一次完整扫描
/// - 规则集合与 HTTP 客户端只构建一次，所有任务只读共享
/// - 单目标：任何错误直接返回
/// - 多目标：单个目标失败只记录日志，不影响其他目标
pub fn run(opts: &ScanOptions) -> Result<ScanStats, ScanError> {
    let engine = PatternEngine::with_exclusions(&opts.extra_file_type_exclusions, &opts.extra_mime_type_exclusions)?;
    let source = DefaultSource::new(&opts.user_agent)?;
    run_with(opts, &engine, &source)
}

/// 使用给定的规则集合与内容源执行扫描
pub fn run_with(opts: &ScanOptions, engine: &PatternEngine, source: &dyn ContentSource) -> Result<ScanStats, ScanError> {
    let targets = resolve_targets(&opts.target)?;
    // 多目标任务共用基础输出路径的扩展名，提前选择输出引擎
    let reporter = Reporter::for_destination(&opts.output)?;

    let mut stats = ScanStats { targets_total: targets.len(), ..Default::default() };

    if targets.len() == 1 {
        let target = targets.into_iter().next().ok_or_else(|| ScanError::TargetResolution(opts.target.clone()))?;
        let task = ScanTask::new(target, opts.output.clone());
        let found = process_task(&task, reporter, engine, source)?;
        stats.targets_scanned = 1;
        stats.findings_total = found;
        return Ok(stats);
    }

    let tasks: Vec<ScanTask> = targets.into_iter().map(|t| ScanTask::derived(t, &opts.output)).collect();
    if opts.parallel {
        scan_parallel(&tasks, reporter, engine, source, opts.worker_count(), &mut stats)?;
    } else {
        scan_sequential(&tasks, reporter, engine, source, &mut stats);
    }

    tracing::info!(
        targets = stats.targets_total,
        scanned = stats.targets_scanned,
        failed = stats.targets_failed,
        findings = stats.findings_total,
        "scan finished"
    );
    Ok(stats)
}

/// 获取内容并运行提取流水线
pub fn scan_task(task: &ScanTask, engine: &PatternEngine, source: &dyn ContentSource) -> Result<ResultSet, ScanError> {
    let target = task.target.to_string();
    tracing::info!(target_name = %target, "scanning target");
    let content = source
        .fetch(&task.target)
        .map_err(|e| ScanError::ContentFetch { target: target.clone(), source: e })?;
    tracing::debug!(target_name = %target, bytes = content.len(), "content loaded");
    Ok(extract(&content, engine, &target, &task.output_destination))
}

/// 单个任务：获取 → 提取 → 输出，返回发现数量
fn process_task(task: &ScanTask, reporter: Reporter, engine: &PatternEngine, source: &dyn ContentSource) -> Result<usize, ScanError> {
    let result = scan_task(task, engine, source)?;
    reporter.render(&result)?;
    Ok(result.findings.len())
}

/// 串行：按输入顺序逐个处理，失败即记录并继续
fn scan_sequential(
    tasks: &[ScanTask],
    reporter: Reporter,
    engine: &PatternEngine,
    source: &dyn ContentSource,
    stats: &mut ScanStats,
) {
    for task in tasks {
        match process_task(task, reporter, engine, source) {
            Ok(found) => {
                stats.targets_scanned += 1;
                stats.findings_total += found;
            }
            Err(e) => {
                stats.targets_failed += 1;
                tracing::error!(target_name = %task.target, error = %e, "target failed");
            }
        }
    }
}

/// 并行调度：
/// - 固定大小的 Rayon 线程池（上限 = workers），每个目标一个任务
/// - 任务结果经通道回传；全部任务结束（汇合点）后再统一记录错误
fn scan_parallel(
    tasks: &[ScanTask],
    reporter: Reporter,
    engine: &PatternEngine,
    source: &dyn ContentSource,
    workers: usize,
    stats: &mut ScanStats,
) -> Result<(), ScanError> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;

    type Msg = (usize /*idx*/, Result<usize, ScanError>);
    let (tx, rx) = channel::bounded::<Msg>(tasks.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("linx-worker-{i}"))
        .build()
        .map_err(|e| ScanError::Config(format!("build worker pool: {e}")))?;

    tracing::debug!(tasks = tasks.len(), workers, "starting parallel scan");
    pool.install(|| {
        tasks.par_iter().enumerate().for_each_with(tx, |tx, (idx, task)| {
            let _ = tx.send((idx, process_task(task, reporter, engine, source)));
        });
    });

    // install 返回即所有任务已结束，Sender 已全部丢弃
    let mut errors: Vec<(usize, ScanError)> = Vec::new();
    for (idx, res) in rx.iter() {
        match res {
            Ok(found) => {
                stats.targets_scanned += 1;
                stats.findings_total += found;
            }
            Err(e) => errors.push((idx, e)),
        }
    }

    stats.targets_failed += errors.len();
    for (idx, e) in errors {
        let target = tasks.get(idx).map(|t| t.target.to_string()).unwrap_or_default();
        tracing::error!(target_name = %target, error = %e, "target failed");
    }
    Ok(())
}
