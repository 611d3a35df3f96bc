use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const RECORD_SEPARATOR: &str = "----------------------------------------";

/// A single question/answer exchange as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLog {
    pub question: String,
    pub answer: String,
}

impl ChatLog {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn at<Tz: TimeZone>(self, timestamp: DateTime<Tz>) -> ChatRecord
    where
        Tz::Offset: fmt::Display,
    {
        ChatRecord {
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            log: self,
        }
    }

    pub fn now(self) -> ChatRecord {
        self.at(Local::now())
    }
}

/// A timestamped chat log, rendered as the text block stored remotely.
///
/// Every record starts with a newline so it stays visually separate from
/// whatever the target already ends with, and closes with the separator line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub timestamp: String,
    pub log: ChatLog,
}

impl ChatRecord {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\nTimestamp: {}\nQuestion: {}\nAnswer: {}\n{}\n",
            self.timestamp, self.log.question, self.log.answer, RECORD_SEPARATOR
        )
    }
}
