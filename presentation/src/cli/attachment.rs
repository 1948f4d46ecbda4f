//! Reading `--attach` / `/attach` files

use duet_domain::Attachment;
use std::path::Path;

/// Read a file into an [`Attachment`], guessing its type from the extension.
///
/// Size and type limits are checked when the run encodes it.
pub fn load_attachment(path: &Path) -> std::io::Result<Attachment> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime_type = Attachment::guess_mime_type(&filename);
    Ok(Attachment::new(bytes, mime_type, filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_attachment_guesses_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Notes.TXT");
        std::fs::write(&path, "hello").unwrap();

        let attachment = load_attachment(&path).unwrap();
        assert_eq!(attachment.filename, "Notes.TXT");
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.bytes, b"hello");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(load_attachment(Path::new("/definitely/not/here.png")).is_err());
    }
}
