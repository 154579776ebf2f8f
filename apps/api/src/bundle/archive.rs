use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Deflates `(name, bytes)` pairs into an in-memory ZIP.
pub fn build_zip<'a>(files: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> zip::result::ZipResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in files {
        writer.start_file(name, options)?;
        writer.write_all(bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// `Content-Disposition` value that survives accented names: an ASCII
/// fallback plus the RFC 5987 UTF-8 form.
pub fn attachment_header(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && c != '"' && !c.is_ascii_control() { c } else { '_' })
        .collect();
    format!(
        "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_build_zip_contains_files() {
        let bytes = build_zip([
            ("a.pdf", b"%PDF-a".as_slice()),
            ("b.docx", b"docx".as_slice()),
        ])
        .unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("a.pdf")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "%PDF-a");
    }

    #[test]
    fn test_attachment_header_escapes_accents() {
        let header = attachment_header("Alami_Hélène_documents.zip");
        assert!(header.starts_with("attachment; filename=\"Alami_H_l_ne_documents.zip\""));
        assert!(header.ends_with("filename*=UTF-8''Alami_H%C3%A9l%C3%A8ne_documents.zip"));
        assert!(header.is_ascii());
    }
}
