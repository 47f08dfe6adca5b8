//! Inquiry form data and its input limits.

pub mod format;
pub mod validation;

use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::catalog::VehicleCategory;
use crate::errors::AttachmentError;
use crate::i18n::{Language, Localized};

pub use validation::validate;

pub const MIN_FACILITY_AMOUNT: f64 = 100_000.0;
pub const MAX_FACILITY_AMOUNT: f64 = 50_000_000.0;
pub const FACILITY_AMOUNT_STEP: f64 = 50_000.0;
pub const DEFAULT_FACILITY_AMOUNT: f64 = 1_000_000.0;
/// Number of manufacture years offered, counting back from the current year.
pub const YEAR_SPAN: i32 = 20;

/// Years offered for the year of manufacture, newest first.
pub fn year_options(current_year: i32) -> Vec<i32> {
    (0..YEAR_SPAN).map(|offset| current_year - offset).collect()
}

pub fn accepts_amount(amount: f64) -> bool {
    (MIN_FACILITY_AMOUNT..=MAX_FACILITY_AMOUNT).contains(&amount)
        && (amount % FACILITY_AMOUNT_STEP).abs() < f64::EPSILON
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    Immediately,
    WithinTwoDays,
    WithinOneWeek,
    WithinTwoWeeks,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::Immediately,
        Timeframe::WithinTwoDays,
        Timeframe::WithinOneWeek,
        Timeframe::WithinTwoWeeks,
    ];

    pub fn as_str(self) -> &'static str {
        self.label(Language::English)
    }

    pub fn label(self, language: Language) -> &'static str {
        let label = match self {
            Timeframe::Immediately => Localized::new("Immediately", "වහාම"),
            Timeframe::WithinTwoDays => Localized::new("Within Two Days", "දින දෙකක් ඇතුළත"),
            Timeframe::WithinOneWeek => Localized::new("Within One Week", "සතියක් ඇතුළත"),
            Timeframe::WithinTwoWeeks => {
                Localized::new("Within Two Weeks", "සති දෙකක් ඇතුළත")
            }
        };
        label.get(language)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle photo passed through unmodified as a mail attachment.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub filename: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(
        filename: impl Into<String>,
        data: Vec<u8>,
    ) -> Result<Self, AttachmentError> {
        let filename = filename.into();
        let content_type = content_type_for(&filename)
            .ok_or_else(|| AttachmentError::UnsupportedType(filename.clone()))?;
        Ok(Self {
            filename,
            content_type,
            data,
        })
    }

    /// Checks type and size without reading the file; returns the file name.
    pub fn inspect(path: &Path, max_bytes: u64) -> Result<String, AttachmentError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if content_type_for(&filename).is_none() {
            return Err(AttachmentError::UnsupportedType(filename));
        }
        let metadata = fs::metadata(path).map_err(|source| AttachmentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if metadata.len() > max_bytes {
            return Err(AttachmentError::TooLarge {
                size: metadata.len(),
                limit: max_bytes,
            });
        }
        Ok(filename)
    }

    /// Reads a JPEG/PNG photo, refusing files above `max_bytes`.
    pub fn from_path(path: &Path, max_bytes: u64) -> Result<Self, AttachmentError> {
        let filename = Self::inspect(path, max_bytes)?;
        let data = fs::read(path).map_err(|source| AttachmentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(filename, data)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("bytes", &self.data.len())
            .finish()
    }
}

fn content_type_for(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

/// Values entered on the inquiry page.
#[derive(Debug, Clone, PartialEq)]
pub struct InquiryForm {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub facility_amount: f64,
    pub tenure_months: u32,
    pub timeframe: Timeframe,
    pub name: String,
    /// Optional; an empty string means no address was given.
    pub email: String,
    pub phone: String,
    pub town: String,
    pub image: Option<ImageAttachment>,
}

impl InquiryForm {
    /// Blank form carrying the page defaults for `category`.
    pub fn new(category: &VehicleCategory, current_year: i32) -> Self {
        Self {
            make: String::new(),
            model: String::new(),
            year: current_year,
            facility_amount: DEFAULT_FACILITY_AMOUNT,
            tenure_months: category.default_tenure(),
            timeframe: Timeframe::default(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            town: String::new(),
            image: None,
        }
    }

    pub fn customer_email(&self) -> Option<&str> {
        let trimmed = self.email.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{get, CategoryId};
    use std::io::Write;

    #[test]
    fn year_options_cover_twenty_years() {
        let years = year_options(2026);
        assert_eq!(years.len(), 20);
        assert_eq!(years.first(), Some(&2026));
        assert_eq!(years.last(), Some(&2007));
    }

    #[test]
    fn amounts_must_sit_on_the_step_grid() {
        assert!(accepts_amount(1_500_000.0));
        assert!(accepts_amount(MIN_FACILITY_AMOUNT));
        assert!(accepts_amount(MAX_FACILITY_AMOUNT));
        assert!(!accepts_amount(1_525_000.0));
        assert!(!accepts_amount(50_000.0));
        assert!(!accepts_amount(50_050_000.0));
    }

    #[test]
    fn new_form_uses_category_defaults() {
        let form = InquiryForm::new(get(CategoryId::Van), 2026);
        assert_eq!(form.year, 2026);
        assert_eq!(form.tenure_months, 36);
        assert_eq!(form.facility_amount, DEFAULT_FACILITY_AMOUNT);
        assert_eq!(form.timeframe, Timeframe::Immediately);
        assert!(form.customer_email().is_none());
    }

    #[test]
    fn attachment_rejects_unsupported_extension() {
        let err = ImageAttachment::new("scan.gif", vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, AttachmentError::UnsupportedType(_)));
    }

    #[test]
    fn attachment_reads_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Aqua.PNG");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let image = ImageAttachment::from_path(&path, 1024).unwrap();
        assert_eq!(image.filename, "Aqua.PNG");
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.size(), 4);

        let err = ImageAttachment::from_path(&path, 2).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { size: 4, limit: 2 }));
    }
}
