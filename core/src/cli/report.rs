use crate::types::LookupRecord;
use std::fmt;
use std::path::PathBuf;

/// Outcome of exporting one file
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ExportEntry {
    /// Input file
    pub source: PathBuf,

    /// Written file
    pub destination: PathBuf,

    /// Lookup returned by the export, with the assigned SOP Instance UID
    pub lookup: LookupRecord,
}

/// Text report formatter for exported files
pub struct TextReport<'a> {
    entries: &'a [ExportEntry],
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(entries: &'a [ExportEntry]) -> Self {
        Self { entries }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "De-identified Files")?;
        writeln!(f, "===================")?;
        writeln!(f)?;

        for entry in self.entries {
            writeln!(f, "{}", entry.source.display())?;
            writeln!(f, "  Output:       {}", entry.destination.display())?;
            writeln!(
                f,
                "  SOP Instance: {}",
                entry.lookup.deid_sop_uid.as_deref().unwrap_or("unchanged")
            )?;
            match &entry.lookup.time_shift {
                Some(shift) => writeln!(f, "  Time Shift:   {}", shift)?,
                None => writeln!(f, "  Time Shift:   none")?,
            }
            writeln!(f)?;
        }

        writeln!(f, "Files: {}", self.entries.len())?;
        Ok(())
    }
}

/// Serializes the export entries as pretty-printed JSON
#[cfg(feature = "json")]
pub fn to_json(entries: &[ExportEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}
