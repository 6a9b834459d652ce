use std::io::{self, Write};

use serde::Serialize;

use crate::app::RunSummary;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TextOutput;

impl TextOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        let mut stdout = io::stdout();
        writeln!(
            stdout,
            "LPSN registry {} ({} rows, {})",
            summary.registry_path, summary.registry_rows, summary.registry_source
        )?;
        let Some(update) = &summary.update else {
            return Ok(());
        };
        writeln!(
            stdout,
            "updated {} of {} rows -> {}",
            update.matched, update.rows, update.outfile
        )?;
        if let Some(map_file) = &update.map_file {
            writeln!(stdout, "join map -> {map_file}")?;
        }
        if let Some(notfound) = &update.notfound_file {
            writeln!(
                stdout,
                "there are {} rows not found in LPSN -> {notfound}",
                update.unmatched
            )?;
        }
        Ok(())
    }
}
