//! Command results on stdout, failures on stderr.
//!
//! With `--json` every command prints one pretty-printed object carrying
//! `success` and `result_code`; otherwise it prints its text summary.

use anyhow::Result;
use fstash_core::{Manifest, StashSummary};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

pub struct OutputWriter {
    format: OutputFormat,
    stdout: io::Stdout,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        Self {
            format,
            stdout: io::stdout(),
        }
    }

    /// Print a command result. `text` is only built in text mode; an empty
    /// string prints nothing.
    pub fn write<T: Serialize>(&self, data: &T, text: impl FnOnce() -> String) -> Result<()> {
        let mut stdout = self.stdout.lock();
        match self.format {
            OutputFormat::Json => writeln!(stdout, "{}", serde_json::to_string_pretty(data)?)?,
            OutputFormat::Text => {
                let text = text();
                if !text.is_empty() {
                    stdout.write_all(text.as_bytes())?;
                }
            }
        }
        Ok(())
    }

    /// Report a failed command on stderr, with its whole context chain.
    pub fn write_error(&self, error: &anyhow::Error, result_code: u8) {
        let message = format!("{:#}", error);
        let mut stderr = io::stderr().lock();
        // Nothing useful is left to do if stderr is gone
        let _ = match self.format {
            OutputFormat::Json => {
                let output = ErrorOutput {
                    success: false,
                    result_code,
                    error: message,
                };
                serde_json::to_string_pretty(&output)
                    .map_err(io::Error::from)
                    .and_then(|json| writeln!(stderr, "{}", json))
            }
            OutputFormat::Text => writeln!(stderr, "Error: {}", message),
        };
    }
}

/// JSON body of a failure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub result_code: u8,
    pub error: String,
}

/// Output for `create`, `expand` and `pop`.
#[derive(Debug, Serialize)]
pub struct StashOutput {
    pub success: bool,
    pub result_code: u8,
    pub operation: &'static str,
    #[serde(flatten)]
    pub stash: StashSummary,
    /// Where files were written (the stash itself for `create`).
    pub destination: String,
}

/// Output for `delete`.
#[derive(Debug, Serialize)]
pub struct DeleteOutput {
    pub success: bool,
    pub result_code: u8,
    pub name: String,
    pub deleted: bool,
}

/// Output for `list`.
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub success: bool,
    pub result_code: u8,
    pub stashes: Vec<String>,
}

/// One directory of a stash for `show`.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryInfo {
    pub path: String,
    pub files: Vec<String>,
}

/// Output for `show`.
#[derive(Debug, Serialize)]
pub struct ShowOutput {
    pub success: bool,
    pub result_code: u8,
    pub name: String,
    pub file_count: usize,
    pub directories: Vec<DirectoryInfo>,
}

impl ShowOutput {
    pub fn new(name: String, manifest: &Manifest) -> Self {
        let directories = manifest
            .iter()
            .map(|(dir, files)| DirectoryInfo {
                path: dir.display().to_string(),
                files: files.iter().cloned().collect(),
            })
            .collect();
        Self {
            success: true,
            result_code: 0,
            name,
            file_count: manifest.file_count(),
            directories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_output_from_manifest() {
        let mut manifest = Manifest::new();
        manifest.insert(".", "b.txt");
        manifest.insert(".", "a.txt");
        manifest.insert("sub", "c.txt");

        let output = ShowOutput::new("demo".to_string(), &manifest);
        assert_eq!(output.file_count, 3);
        assert_eq!(output.directories.len(), 2);
        assert_eq!(output.directories[0].path, ".");
        assert_eq!(output.directories[0].files, ["a.txt", "b.txt"]);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["directories"][1]["path"], "sub");
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_format_from_flag() {
        assert_eq!(OutputWriter::new(true).format, OutputFormat::Json);
        assert_eq!(OutputWriter::new(false).format, OutputFormat::Text);
    }

    #[test]
    fn test_error_output_shape() {
        let output = ErrorOutput {
            success: false,
            result_code: 3,
            error: "not found".to_string(),
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["result_code"], 3);
        assert_eq!(json["error"], "not found");
    }
}
