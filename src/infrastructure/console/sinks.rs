use std::{
    io::Write,
    sync::{Arc, Mutex},
};
use tracing::{info, warn};

use crate::domain::repositories::sinks::{StatusSink, UserNotifier};

/// Writes each status update as one line to the wrapped writer.
pub struct LineSink<W: Write + Send> {
    label: &'static str,
    writer: Mutex<W>,
}

impl<W: Write + Send> LineSink<W> {
    pub fn new(label: &'static str, writer: W) -> Self {
        Self {
            label,
            writer: Mutex::new(writer),
        }
    }
}

impl LineSink<std::io::Stdout> {
    pub fn stdout(label: &'static str) -> Self {
        Self::new(label, std::io::stdout())
    }
}

impl<W: Write + Send> StatusSink for LineSink<W> {
    fn write(&self, text: &str) {
        let Ok(mut writer) = self.writer.lock() else {
            warn!(sink = self.label, "console: writer lock poisoned");
            return;
        };
        if let Err(err) = writeln!(writer, "{}", text).and_then(|_| writer.flush()) {
            warn!(sink = self.label, error = %err, "console: failed to write status");
        }
    }
}

/// Prints notifications to stdout and mirrors them into the log.
pub struct ConsoleNotifier<S: StatusSink> {
    sink: Arc<S>,
}

impl<S: StatusSink> ConsoleNotifier<S> {
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }
}

impl<S: StatusSink> UserNotifier for ConsoleNotifier<S> {
    fn notify(&self, message: &str) {
        info!(%message, "notification");
        self.sink.write(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::sinks::MockStatusSink;

    #[test]
    fn line_sink_appends_newline_per_update() {
        let sink = LineSink::new("motor", Vec::new());
        sink.write("Motor RPM: 400");
        sink.write("Motor RPM: 800");

        let written = sink.writer.into_inner().unwrap();
        assert_eq!(String::from_utf8(written).unwrap(), "Motor RPM: 400\nMotor RPM: 800\n");
    }

    #[test]
    fn notifier_forwards_to_sink() {
        let mut sink = MockStatusSink::new();
        sink.expect_write()
            .withf(|text| text == "Upload failed: No file uploaded")
            .times(1)
            .return_const(());

        ConsoleNotifier::new(Arc::new(sink)).notify("Upload failed: No file uploaded");
    }
}
