//! 日志基础设施

use std::io;

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

pub struct Logger;

impl Logger {
    /// 初始化 tracing subscriber
    ///
    /// `RUST_LOG` 优先于配置中的日志级别。配置了 `log_dir` 时额外写入按天滚动的日志文件，
    /// 返回的 guard 必须在进程生命周期内保持存活，否则文件日志会丢失。
    pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))?;

        let console = fmt::layer().with_writer(io::stdout).with_ansi(true);

        match &config.log_dir {
            Some(log_dir) => {
                std::fs::create_dir_all(log_dir)?;

                let file_appender = rolling::daily(log_dir, &config.file_prefix);
                let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

                tracing_subscriber::registry()
                    .with(filter)
                    .with(console)
                    .with(
                        fmt::layer()
                            .with_writer(non_blocking)
                            .with_ansi(false)
                            .with_target(false),
                    )
                    .try_init()?;

                Ok(Some(guard))
            }
            None => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(console)
                    .try_init()?;

                Ok(None)
            }
        }
    }
}
