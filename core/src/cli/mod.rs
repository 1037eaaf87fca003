pub mod report;

use crate::types::{DeidConfig, LookupRecord, TimeShift};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Command-line arguments for dicomdeid
#[derive(Parser, Debug)]
#[command(name = "dicomdeid")]
#[command(about = "De-identify DICOM files for export")]
#[command(version)]
pub struct Cli {
    /// DICOM files or directories containing DICOM files
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory the de-identified files are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Days added to every date; omit or pass 0 to delete dates and times
    #[arg(short, long, allow_hyphen_values = true)]
    pub time_shift: Option<i64>,

    /// Substitute Patient ID (generated when omitted)
    #[arg(long)]
    pub patient_id: Option<String>,

    /// Substitute Study Instance UID (generated per file when omitted)
    #[arg(long)]
    pub study_uid: Option<String>,

    /// Substitute Series Instance UID (generated per file when omitted)
    #[arg(long)]
    pub series_uid: Option<String>,

    /// Copy files without de-identifying them
    #[arg(long)]
    pub keep_identity: bool,

    /// Strip pixel data from the exported files
    #[arg(long)]
    pub remove_pixel_data: bool,

    /// Output format of the report
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

impl Cli {
    /// Export configuration selected by the flags
    pub fn config(&self) -> DeidConfig {
        DeidConfig::default()
            .deidentify(!self.keep_identity)
            .remove_pixel_data(self.remove_pixel_data)
    }

    /// Builds a fresh lookup for one input file
    ///
    /// The output keeps the input's file name.
    pub fn lookup_for(&self, input: &Path) -> LookupRecord {
        LookupRecord {
            filename: input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            deid_patient_id: self.patient_id.clone(),
            deid_study_uid: self.study_uid.clone(),
            deid_series_uid: self.series_uid.clone(),
            deid_sop_uid: None,
            time_shift: self.time_shift.map(TimeShift::Days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::parse_from(["dicomdeid", "in.dcm", "--output-dir", "out"]);
        assert_eq!(cli.inputs, vec![PathBuf::from("in.dcm")]);
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert!(cli.time_shift.is_none());
        assert_eq!(cli.config(), DeidConfig::default());
    }

    #[test]
    fn test_parse_negative_time_shift() {
        let cli = Cli::parse_from(["dicomdeid", "in.dcm", "-o", "out", "--time-shift", "-30"]);
        assert_eq!(cli.time_shift, Some(-30));
    }

    #[test]
    fn test_parse_rejects_non_integer_time_shift() {
        let result = Cli::try_parse_from(["dicomdeid", "in.dcm", "-o", "out", "-t", "e"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_flags() {
        let cli = Cli::parse_from([
            "dicomdeid",
            "in.dcm",
            "-o",
            "out",
            "--keep-identity",
            "--remove-pixel-data",
        ]);
        let config = cli.config();
        assert!(!config.deidentify);
        assert!(config.remove_pixel_data);
    }

    #[test]
    fn test_lookup_for() {
        let cli = Cli::parse_from([
            "dicomdeid",
            "in.dcm",
            "-o",
            "out",
            "-t",
            "16",
            "--study-uid",
            "1.2.33333333333",
        ]);

        let lookup = cli.lookup_for(Path::new("/data/series/IM0001.dcm"));
        assert_eq!(lookup.filename.as_deref(), Some("IM0001.dcm"));
        assert_eq!(lookup.deid_study_uid.as_deref(), Some("1.2.33333333333"));
        assert!(lookup.deid_series_uid.is_none());
        assert!(lookup.deid_sop_uid.is_none());
        assert_eq!(lookup.time_shift, Some(TimeShift::Days(16)));
    }
}
