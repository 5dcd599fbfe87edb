use crate::error::Result;

/// Error lines collected during a run, sent out by `afterrun`.
#[derive(Debug, Clone)]
pub struct Report {
    header: String,
    lines: Vec<String>,
}

impl Report {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            lines: Vec::new(),
        }
    }

    pub fn add(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        let mut body = self.header.clone();
        for line in &self.lines {
            body.push_str(line);
            body.push('\n');
        }
        body
    }
}

/// Delivers the end-of-run report; mail transport belongs to the pipeline.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

/// Notifier that writes the report to the log instead of mailing it
pub struct LogNotifier;

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        tracing::info!("📧 Report for {} ({}):\n{}", to, subject, body);
        Ok(())
    }
}

pub fn report_subject(module_name: &str) -> String {
    format!("**{}** report", module_name)
}
