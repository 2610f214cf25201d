use ariadne::{Color, Fmt};
use std::cell::RefCell;
use std::rc::Rc;

/// Destination for `put` output.
pub trait OutputSink {
    fn write_line(&mut self, text: &str);
}

/// Runtime options chosen on the command line.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    pub fn sink(&self) -> Box<dyn OutputSink> {
        Box::new(StdoutSink::new(self.color))
    }
}

pub struct StdoutSink {
    color: bool,
}

impl StdoutSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl OutputSink for StdoutSink {
    fn write_line(&mut self, text: &str) {
        if self.color {
            println!("{}", text.fg(Color::Cyan));
        } else {
            println!("{}", text);
        }
    }
}

/// Collects lines in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    lines: Rc<RefCell<Vec<String>>>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl OutputSink for CapturedOutput {
    fn write_line(&mut self, text: &str) {
        self.lines.borrow_mut().push(text.to_string());
    }
}
