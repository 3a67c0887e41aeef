use crate::error::ValidationError;

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// What is known about a file before its contents are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

/// Size is checked before type.
pub fn validate(meta: &FileMeta) -> Result<(), ValidationError> {
    if meta.size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size: meta.size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    let mime = meta.mime.trim().to_ascii_lowercase();
    if !ACCEPTED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(ValidationError::UnsupportedType(meta.mime.clone()));
    }
    Ok(())
}

/// A user supplied file with its contents loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn meta(&self) -> FileMeta {
        FileMeta {
            name: self.name.clone(),
            mime: self.mime.clone(),
            size: self.bytes.len() as u64,
        }
    }
}

/// An accepted image and its preview resource. Dropping the image drops `H`,
/// which must release the resource.
#[derive(Debug)]
pub struct UploadedImage<H> {
    name: String,
    mime: String,
    bytes: Vec<u8>,
    preview: H,
}

impl<H> UploadedImage<H> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn preview(&self) -> &H {
        &self.preview
    }
}

/// Holds at most one live image.
#[derive(Debug)]
pub struct UploadSlot<H> {
    current: Option<UploadedImage<H>>,
}

impl<H> Default for UploadSlot<H> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<H> UploadSlot<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `upload` and, if accepted, releases the previous preview
    /// before `make_preview` creates the new one. A rejected upload leaves the
    /// current image in place.
    pub fn replace<F>(&mut self, upload: Upload, make_preview: F) -> Result<&UploadedImage<H>, ValidationError>
    where
        F: FnOnce(&Upload) -> H,
    {
        if let Err(e) = validate(&upload.meta()) {
            log::warn!("Rejected upload {}: {}", upload.name, e);
            return Err(e);
        }

        drop(self.current.take());
        let preview = make_preview(&upload);
        log::info!("Accepted upload {} ({} bytes)", upload.name, upload.bytes.len());

        let image = self.current.insert(UploadedImage {
            name: upload.name,
            mime: upload.mime,
            bytes: upload.bytes,
            preview,
        });
        Ok(&*image)
    }

    /// Releases the current image, returning whether there was one.
    pub fn clear(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn current(&self) -> Option<&UploadedImage<H>> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
