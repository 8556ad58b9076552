use std::io::{Cursor, Write};
use std::str::FromStr;

use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::models::StoredReport;

/// Which artifact goes into a batch export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Txt,
}

impl ExportFormat {
    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Txt => "txt",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(ExportFormat::Pdf),
            "txt" => Ok(ExportFormat::Txt),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// Packs reports into a deflate-compressed zip archive
///
/// Entries are named `report_<id>.<ext>`.
pub fn zip_reports(reports: &[StoredReport], format: ExportFormat) -> ZipResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for report in reports {
        let name = format!("report_{}.{}", report.id, format.extension());
        writer.start_file(name, options)?;
        match format {
            ExportFormat::Pdf => writer.write_all(&report.document)?,
            ExportFormat::Txt => writer.write_all(report.transcript.as_bytes())?,
        }
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use chrono::Utc;
    use std::io::Read;
    use zip::ZipArchive;

    fn sample(owner: &str) -> StoredReport {
        StoredReport::new(
            owner,
            "idea",
            "the transcript".to_string(),
            b"%PDF-1.4 bytes".to_vec(),
            Language::English,
            Utc::now(),
        )
    }

    #[test]
    fn test_zip_entry_names_and_content() {
        let reports = vec![sample("alice"), sample("alice")];
        let bytes = zip_reports(&reports, ExportFormat::Pdf).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        for report in &reports {
            let name = format!("report_{}.pdf", report.id);
            let mut entry = archive.by_name(&name).unwrap();
            let mut content = Vec::new();
            entry.read_to_end(&mut content).unwrap();
            assert_eq!(content, report.document);
        }
    }

    #[test]
    fn test_txt_export_uses_transcript() {
        let reports = vec![sample("bob")];
        let bytes = zip_reports(&reports, ExportFormat::Txt).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entry = archive.by_index(0).unwrap();
        assert!(entry.name().ends_with(".txt"));
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "the transcript");
    }

    #[test]
    fn test_empty_export_is_a_valid_archive() {
        let bytes = zip_reports(&[], ExportFormat::Pdf).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
