//! Review summary export.

use std::path::Path;

use crate::domain::SummaryEntry;

pub struct SummaryExporter;

impl SummaryExporter {
    /// Writes the summary as `Section,Field,Value` rows.
    ///
    /// # Returns
    ///
    /// The filename on success, or an error message.
    pub fn export_to_csv(entries: &[SummaryEntry], filename: &str) -> Result<String, String> {
        let path = Path::new(filename);
        let mut writer = csv::Writer::from_path(path).map_err(|e| e.to_string())?;

        writer
            .write_record(["Section", "Field", "Value"])
            .map_err(|e| e.to_string())?;
        for entry in entries {
            writer
                .write_record([entry.section, entry.label, entry.value.as_str()])
                .map_err(|e| e.to_string())?;
        }
        writer.flush().map_err(|e| e.to_string())?;

        Ok(filename.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PartnershipApplication, WizardForm};
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.csv");
        let filename = path.to_str().unwrap();

        let entries = vec![
            SummaryEntry { section: "Organization", label: "Organization name", value: "KazNU".to_string() },
            SummaryEntry { section: "Contact", label: "Address", value: "Almaty, al-Farabi 71".to_string() },
        ];
        let result = SummaryExporter::export_to_csv(&entries, filename);
        assert_eq!(result, Ok(filename.to_string()));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, vec!["Section", "Field", "Value"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][2], "Almaty, al-Farabi 71");
    }

    #[test]
    fn test_export_form_summary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partnership.csv");
        let mut form = PartnershipApplication::default();
        form.organization.name = "Turan University".to_string();

        SummaryExporter::export_to_csv(&form.summary(), path.to_str().unwrap()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Organization,Organization name,Turan University"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope").join("summary.csv");
        assert!(SummaryExporter::export_to_csv(&[], path.to_str().unwrap()).is_err());
    }
}
