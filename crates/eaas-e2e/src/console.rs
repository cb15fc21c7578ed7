// Console capture
//
// Installs an init script that mirrors console output into a page-global
// buffer, then reads the buffer back on demand. The script runs on every
// navigation, so the buffer always describes the current document.

use crate::error::Result;
use playwright_rs::Page;
use serde::Deserialize;

const BUFFER: &str = "__eaasConsole";

const INIT_SCRIPT: &str = r#"(() => {
  if (window.__eaasConsole) return;
  const buffer = [];
  Object.defineProperty(window, '__eaasConsole', { value: buffer });
  const render = (arg) => {
    if (typeof arg === 'string') return arg;
    if (arg instanceof Error) return arg.message;
    try { return JSON.stringify(arg); } catch (_) { return String(arg); }
  };
  for (const level of ['log', 'info', 'warn', 'error', 'debug']) {
    const original = console[level].bind(console);
    console[level] = (...args) => {
      buffer.push({ level, text: args.map(render).join(' ') });
      original(...args);
    };
  }
  window.addEventListener('error', (event) => {
    buffer.push({ level: 'error', text: String(event.message) });
  });
  window.addEventListener('unhandledrejection', (event) => {
    buffer.push({ level: 'error', text: 'Unhandled rejection: ' + render(event.reason) });
  });
})();"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub text: String,
}

/// Handle to the console mirror of one page.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleCapture;

impl ConsoleCapture {
    /// Installs the mirror. Takes effect from the next navigation on.
    pub async fn install(page: &Page) -> Result<Self> {
        page.add_init_script(INIT_SCRIPT).await?;
        Ok(ConsoleCapture)
    }

    /// Everything logged by the current document so far.
    pub async fn messages(&self, page: &Page) -> Result<Vec<ConsoleMessage>> {
        let raw = page
            .evaluate_value(&format!("JSON.stringify(window.{BUFFER} || [])"))
            .await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Error-level messages not matching any of `ignore` (substring match).
    pub async fn errors(&self, page: &Page, ignore: &[&str]) -> Result<Vec<ConsoleMessage>> {
        Ok(filter_errors(self.messages(page).await?, ignore))
    }
}

fn filter_errors(messages: Vec<ConsoleMessage>, ignore: &[&str]) -> Vec<ConsoleMessage> {
    messages
        .into_iter()
        .filter(|m| m.level == ConsoleLevel::Error)
        .filter(|m| !ignore.iter().any(|noise| m.text.contains(noise)))
        .collect()
}
