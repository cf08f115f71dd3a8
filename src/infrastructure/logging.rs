use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    pub include_file_location: bool,
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            include_file_location: false,
            filter: None,
        }
    }
}

impl LoggingConfig {
    /// 根据日志级别名称创建配置，无法识别时回退到 INFO
    pub fn with_level_name(mut self, level: &str) -> Self {
        self.level = parse_level(level).unwrap_or(Level::INFO);
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        if debug {
            self.level = Level::DEBUG;
            self.format = LogFormat::Pretty;
            self.include_file_location = true;
        }
        self
    }
}

/// 日志格式
#[derive(Debug, Clone)]
pub enum LogFormat {
    /// 人类可读的格式
    Pretty,
    /// 紧凑格式
    Compact,
}

/// 日志输出目标
#[derive(Debug, Clone)]
pub enum LogOutput {
    Stdout,
    /// 构建控制台只保留监听器输出，日志默认写到标准错误
    Stderr,
}

pub fn parse_level(level: &str) -> Option<Level> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// 设置日志系统
pub fn setup_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = if let Some(filter) = &config.filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::from_default_env()
            .add_directive(format!("reviewboard_ci={}", config.level).parse()?)
    };

    let fmt_layer = match config.output {
        LogOutput::Stdout => create_fmt_layer(&config, io::stdout),
        LogOutput::Stderr => create_fmt_layer(&config, io::stderr),
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .try_init()?;

    Ok(())
}

fn create_fmt_layer<W>(
    config: &LoggingConfig,
    make_writer: W,
) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(make_writer)
        .with_target(true)
        .with_level(true)
        .with_file(config.include_file_location)
        .with_line_number(config.include_file_location);

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}
