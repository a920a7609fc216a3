//! quicklist import/export command implementations.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::transfer::{self, Format};

use super::GlobalOptions;

pub struct ExportOptions {
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub global: GlobalOptions,
}

pub struct ImportOptions {
    pub path: PathBuf,
    pub format: Option<String>,
    pub global: GlobalOptions,
}

#[derive(Serialize)]
struct ExportOutput {
    format: Format,
    exported: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    /// Export text when no output file was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

pub fn run_export(options: ExportOptions) -> Result<()> {
    let format = match (options.format.as_deref(), options.output.as_deref()) {
        (Some(raw), _) => raw.parse::<Format>()?,
        (None, Some(path)) => Format::from_path(path)?,
        (None, None) => Format::Json,
    };
    if options.output.is_none() && !format.is_text() {
        return Err(Error::InvalidArgument(format!(
            "{format} export requires --output <path>"
        )));
    }

    let ctx = options.global.load_context()?;
    let (bytes, exported) = transfer::export(&ctx.store, format)?;

    let Some(path) = options.output else {
        // Stdout export: the payload itself is the output.
        if options.global.json {
            let output = ExportOutput {
                format,
                exported,
                path: None,
                content: Some(String::from_utf8_lossy(&bytes).into_owned()),
            };
            return emit_success(options.global.output(), "export", &output, None);
        }
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&bytes)?;
        stdout.flush()?;
        return Ok(());
    };

    transfer::write_file(&path, &bytes)?;

    let mut human = HumanOutput::new(format!("Exported {exported} tasks"));
    human.push_summary("Format", format.to_string());
    human.push_summary("Path", path.display().to_string());

    let output = ExportOutput {
        format,
        exported,
        path: Some(path),
        content: None,
    };
    emit_success(options.global.output(), "export", &output, Some(&human))
}

pub fn run_import(options: ImportOptions) -> Result<()> {
    let format = match options.format.as_deref() {
        Some(raw) => raw.parse::<Format>()?,
        None => Format::from_path(&options.path)?,
    };
    let bytes = std::fs::read(&options.path)?;

    let ctx = options.global.load_context()?;
    let report = transfer::import(&ctx.store, format, &bytes)?;

    let mut human = HumanOutput::new(format!("Imported {} tasks", report.imported));
    human.push_summary("Format", format.to_string());
    human.push_summary("Source", options.path.display().to_string());
    human.push_next_step("quicklist list --status all");

    emit_success(options.global.output(), "import", &report, Some(&human))
}
