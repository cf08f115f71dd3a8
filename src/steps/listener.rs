use std::sync::Mutex;

/// 构建控制台输出接口
///
/// 构建步骤通过它向用户报告错误，不会向宿主抛出异常。
pub trait BuildListener: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// 输出到标准输出/标准错误，tracing 只在 debug 级别留一份
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleListener;

impl BuildListener for ConsoleListener {
    fn info(&self, message: &str) {
        tracing::debug!("{}", message);
        println!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::debug!("{}", message);
        eprintln!("ERROR: {}", message);
    }
}

/// 记录所有输出，便于断言
#[derive(Debug, Default)]
pub struct RecordingListener {
    lines: Mutex<Vec<ListenerLine>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerLine {
    Info(String),
    Error(String),
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<ListenerLine> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                ListenerLine::Error(message) => Some(message),
                ListenerLine::Info(_) => None,
            })
            .collect()
    }

    /// 任意一行包含给定文本
    pub fn contains(&self, text: &str) -> bool {
        self.lines().iter().any(|line| match line {
            ListenerLine::Info(message) | ListenerLine::Error(message) => message.contains(text),
        })
    }

    fn record(&self, line: ListenerLine) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).push(line);
    }
}

impl BuildListener for RecordingListener {
    fn info(&self, message: &str) {
        self.record(ListenerLine::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.record(ListenerLine::Error(message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_listener() {
        let listener = RecordingListener::new();
        listener.info("starting");
        listener.error("something broke");

        assert_eq!(listener.lines().len(), 2);
        assert_eq!(listener.errors(), vec!["something broke".to_string()]);
        assert!(listener.contains("broke"));
        assert!(!listener.contains("missing"));
    }
}
