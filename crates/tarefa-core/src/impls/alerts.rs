use std::sync::Mutex;

use crate::ports::AlertSink;

/// CollectingAlertSink はアラートを表示せずに溜める（テスト用）
#[derive(Debug, Default)]
pub struct CollectingAlertSink {
    messages: Mutex<Vec<String>>,
}

impl CollectingAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_else(|e| e.into_inner().clone())
    }
}

impl AlertSink for CollectingAlertSink {
    fn alert(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}
