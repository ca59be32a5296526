// ==========================================
// 电机运行监测系统 - 命令行主入口
// ==========================================
// 子命令: run / watch / alarms / add / simulate / history / config
// 数据目录: $MOTOR_MONITOR_HOME 或用户数据目录
// ==========================================

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use motor_monitor::app::{get_default_data_dir, AppState};
use motor_monitor::config::config_keys;
use motor_monitor::domain::Reading;
use motor_monitor::importer::{history_series, DataCleaner};
use motor_monitor::logging;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "motor-monitor", version)]
#[command(about = "电机运行监测: 异常评分、原因分类与报警记录", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// 本次运行的文件路径覆写（不写入配置库）
#[derive(Args, Debug, Default)]
struct PathArgs {
    /// 读数表路径（.csv / .xlsx / .xls）
    #[arg(long, value_name = "PATH")]
    table: Option<PathBuf>,

    /// 报警日志路径（.csv）
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// 执行一次 加载 → 检测 → 分类 → 记录，输出 JSON 报告
    Run {
        #[command(flatten)]
        paths: PathArgs,
    },

    /// 定时执行监测流程，Ctrl-C 退出
    Watch {
        /// 刷新间隔（秒）
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=86_400))]
        interval: u64,

        #[command(flatten)]
        paths: PathArgs,
    },

    /// 报警历史与等级分布
    Alarms,

    /// 人工录入一条读数（支持小数逗号）
    Add {
        /// 电流 (A)
        #[arg(value_parser = parse_measurement)]
        current: f64,
        /// 扭矩 (N·m)
        #[arg(value_parser = parse_measurement)]
        torque: f64,
        /// 液压 (bar)
        #[arg(value_parser = parse_measurement)]
        pressure: f64,
        /// 油温 (°C)
        #[arg(value_parser = parse_measurement)]
        temp: f64,
    },

    /// 追加模拟读数
    Simulate {
        /// 行数
        count: usize,

        /// 随机种子（默认取当前时间）
        #[arg(long)]
        seed: Option<u64>,
    },

    /// 扭矩 / 油温历史趋势
    History {
        /// 分钟数
        #[arg(default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
        points: u32,
    },

    /// 查看配置（无子命令）或修改配置
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 写入配置项
    Set {
        #[arg(value_parser = parse_config_key)]
        key: String,
        value: String,
    },
    /// 删除配置项（恢复默认值）
    Unset {
        #[arg(value_parser = parse_config_key)]
        key: String,
    },
}

fn parse_measurement(raw: &str) -> Result<f64, String> {
    let cleaner = DataCleaner;
    cleaner
        .parse_decimal(raw)
        .and_then(|v| cleaner.validate_reading(v))
        .ok_or_else(|| format!("无效读数: {}（须为非负数）", raw))
}

fn parse_config_key(raw: &str) -> Result<String, String> {
    if config_keys::ALL.contains(&raw) {
        Ok(raw.to_string())
    } else {
        Err(format!("未知配置键（可用: {}）", config_keys::ALL.join(", ")))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init();

    let data_dir = get_default_data_dir();
    tracing::info!("{} v{}", motor_monitor::APP_NAME, motor_monitor::VERSION);

    let PathArgs { table, log } = match &cli.command {
        Commands::Run { paths } | Commands::Watch { paths, .. } => PathArgs {
            table: paths.table.clone(),
            log: paths.log.clone(),
        },
        _ => PathArgs::default(),
    };
    let state = AppState::new(data_dir, move |mut config| {
        if let Some(path) = table {
            config = config.with_readings_path(path);
        }
        if let Some(path) = log {
            config = config.with_alarm_log_path(path);
        }
        config
    })
    .await
    .map_err(|e| anyhow!("初始化失败: {}", e))?;

    match cli.command {
        Commands::Run { .. } => {
            let report = state.monitor_api.run_pass(now())?;
            print_json(&report)?;
        }
        Commands::Watch { interval, .. } => {
            watch(Arc::clone(&state.monitor_api), Duration::from_secs(interval)).await?;
        }
        Commands::Alarms => {
            print_json(&state.monitor_api.alarm_summary())?;
        }
        Commands::Add {
            current,
            torque,
            pressure,
            temp,
        } => {
            let reading = Reading::new(current, torque, pressure, temp).with_timestamp(now());
            let saved = state.monitor_api.submit_manual(reading)?;
            for warning in &saved.warnings {
                eprintln!("警告: {}", warning);
            }
            println!("已保存，读数表共 {} 行", saved.data);
        }
        Commands::Simulate { count, seed } => {
            let start = now();
            let seed = seed.unwrap_or_else(|| start.and_utc().timestamp() as u64);
            let saved = state.monitor_api.simulate(count, seed, start)?;
            println!("已追加 {} 条模拟读数，读数表共 {} 行", count, saved.data);
        }
        Commands::History { points } => {
            print_json(&history_series(points, state.config.detector.seed))?;
        }
        Commands::Config { action } => config_command(&state, action)?,
    }

    Ok(())
}

/// 定时执行监测流程；每次在阻塞线程池中运行，上一次结束后才开始下一次
async fn watch(api: Arc<motor_monitor::MonitorApi>, period: Duration) -> Result<()> {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let api = Arc::clone(&api);
                let outcome = tokio::task::spawn_blocking(move || api.run_pass(now())).await?;
                match outcome {
                    Ok(report) => {
                        println!(
                            "{} 总数={} 风险={} 正常={} 新增报警={}",
                            report.scored_at, report.total, report.risk, report.normal, report.alarms_appended
                        );
                        for warning in &report.warnings {
                            eprintln!("警告: {}", warning);
                        }
                    }
                    // 单次失败不终止定时任务，下一周期从头重试
                    Err(e) => tracing::error!(error = %e, "本次监测流程失败"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("收到中断信号，停止监测");
                return Ok(());
            }
        }
    }
}

fn config_command(state: &AppState, action: Option<ConfigAction>) -> Result<()> {
    let cm = &state.config_manager;
    match action {
        None => {
            let stored: serde_json::Value = serde_json::from_str(
                &cm.get_config_snapshot().map_err(|e| anyhow!("{}", e))?,
            )?;
            print_json(&serde_json::json!({
                "db_path": state.db_path(),
                "stored": stored,
                "effective": state.config,
            }))
        }
        Some(ConfigAction::Set { key, value }) => {
            cm.set_config_value(&key, &value).map_err(|e| anyhow!("{}", e))?;
            println!("{} = {}", key, value);
            Ok(())
        }
        Some(ConfigAction::Unset { key }) => {
            let removed = cm.remove_config_value(&key).map_err(|e| anyhow!("{}", e))?;
            println!("{} {}", key, if removed { "已恢复默认值" } else { "未设置" });
            Ok(())
        }
    }
}
