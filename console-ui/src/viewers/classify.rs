use shared_types::FileDescriptor;

/// Rendering category of a previewed file. Always recomputed from the
/// descriptor, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// Paged formats shown through the embedded document viewer (PDF).
    Document,
    Image,
    PlainText,
    /// Diagnostic imaging formats (DICOM, NIfTI, ...).
    MedicalImage,
    Unsupported,
}

const MEDICAL_EXTENSIONS: &[&str] = &["dcm", "dicom", "nii", "nii.gz", "nifti", "nrrd", "mha", "mhd"];
const MEDICAL_MIME_MARKERS: &[&str] = &["dicom", "medical"];
const DOCUMENT_MIME: &str = "application/pdf";
const DOCUMENT_EXTENSION: &str = "pdf";
const TEXT_EXTENSIONS: &[&str] = &["txt", "csv", "log", "md", "json", "xml"];

pub fn classify(descriptor: &FileDescriptor) -> FileCategory {
    let name = descriptor.normalized_name();
    let mime = descriptor.normalized_mimetype();

    if MEDICAL_EXTENSIONS.iter().any(|ext| has_extension(&name, ext))
        || MEDICAL_MIME_MARKERS.iter().any(|marker| mime.contains(marker))
    {
        return FileCategory::MedicalImage;
    }

    if mime == DOCUMENT_MIME || has_extension(&name, DOCUMENT_EXTENSION) {
        return FileCategory::Document;
    }

    if mime.starts_with("image/") {
        return FileCategory::Image;
    }

    if mime.starts_with("text/") || TEXT_EXTENSIONS.iter().any(|ext| has_extension(&name, ext)) {
        return FileCategory::PlainText;
    }

    FileCategory::Unsupported
}

fn has_extension(name: &str, ext: &str) -> bool {
    name.len() > ext.len() + 1
        && name.ends_with(ext)
        && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
}

impl FileCategory {
    pub fn label(self) -> &'static str {
        match self {
            FileCategory::Document => "document",
            FileCategory::Image => "image",
            FileCategory::PlainText => "text",
            FileCategory::MedicalImage => "medical",
            FileCategory::Unsupported => "other",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FileCategory::Document => "📕",
            FileCategory::Image => "🖼️",
            FileCategory::PlainText => "📝",
            FileCategory::MedicalImage => "🩺",
            FileCategory::Unsupported => "📄",
        }
    }

    /// Document zoom is a visual scale of the embedded surface, not a re-render.
    pub fn supports_zoom(self) -> bool {
        !matches!(self, FileCategory::Unsupported)
    }

    pub fn supports_rotation(self) -> bool {
        matches!(
            self,
            FileCategory::Document | FileCategory::Image | FileCategory::MedicalImage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: Option<&str>) -> FileDescriptor {
        let descriptor = FileDescriptor::new(1, name);
        match mime {
            Some(m) => descriptor.with_mimetype(m),
            None => descriptor,
        }
    }

    #[test]
    fn medical_wins_over_every_other_rule() {
        assert_eq!(classify(&file("scan.dcm", Some("application/dicom"))), FileCategory::MedicalImage);
        assert_eq!(classify(&file("brain.nii.gz", Some("application/gzip"))), FileCategory::MedicalImage);
        assert_eq!(classify(&file("study.png", Some("image/x-medical"))), FileCategory::MedicalImage);
        assert_eq!(classify(&file("CT.DCM", None)), FileCategory::MedicalImage);
    }

    #[test]
    fn pdf_by_mimetype_or_extension() {
        assert_eq!(classify(&file("report", Some("application/pdf"))), FileCategory::Document);
        assert_eq!(classify(&file("Report.PDF", None)), FileCategory::Document);
    }

    #[test]
    fn image_needs_image_mimetype() {
        assert_eq!(classify(&file("photo.jpg", Some("image/jpeg"))), FileCategory::Image);
        assert_eq!(classify(&file("photo.jpg", None)), FileCategory::Unsupported);
    }

    #[test]
    fn text_by_mimetype_or_extension() {
        assert_eq!(classify(&file("notes.txt", Some("text/plain"))), FileCategory::PlainText);
        assert_eq!(classify(&file("data.csv", None)), FileCategory::PlainText);
        assert_eq!(classify(&file("page.html", Some("text/html"))), FileCategory::PlainText);
    }

    #[test]
    fn keyword_lookalikes_stay_in_their_category() {
        assert_eq!(classify(&file("contract.pdf", None)), FileCategory::Document);
        assert_eq!(classify(&file("scanner-manual.txt", None)), FileCategory::PlainText);
    }

    #[test]
    fn everything_else_is_unsupported() {
        assert_eq!(
            classify(&file("letter.docx", Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"))),
            FileCategory::Unsupported
        );
        assert_eq!(classify(&file("", None)), FileCategory::Unsupported);
        assert_eq!(classify(&file(".txt", None)), FileCategory::Unsupported);
    }

    #[test]
    fn classification_is_stable_across_calls() {
        let inputs = [
            file("scan.dcm", Some("application/dicom")),
            file("a.pdf", None),
            file("b.png", Some("image/png")),
            file("c.txt", None),
            file("d.bin", Some("application/octet-stream")),
        ];
        for input in &inputs {
            let first = classify(input);
            for _ in 0..3 {
                assert_eq!(classify(input), first);
            }
        }
    }

    #[test]
    fn rotation_capability_excludes_text() {
        assert!(FileCategory::PlainText.supports_zoom());
        assert!(!FileCategory::PlainText.supports_rotation());
        assert!(FileCategory::Document.supports_rotation());
        assert!(!FileCategory::Unsupported.supports_zoom());
    }
}
