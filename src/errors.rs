use thiserror::Error;

use crate::session::Page;

/// Submit-time validation failures, reported in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required fields (name, phone, nearest town)")]
    MissingRequiredFields,
    #[error("missing vehicle identification (make and model)")]
    MissingVehicleIdentification,
    #[error("invalid email format")]
    InvalidEmailFormat,
}

/// Rejected page transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("`{action}` is not available on the {page} page")]
    WrongPage { action: &'static str, page: Page },
    #[error("no vehicle category selected")]
    CategoryNotSelected,
    #[error("select a registration status first")]
    RegistrationNotSelected,
    #[error("select a vehicle type first")]
    TrimNotSelected,
    #[error("{0} has no registration or vehicle type options")]
    NoSubSelection(&'static str),
    #[error("unknown vehicle category: {0}")]
    UnknownCategory(String),
}

/// Failures while reading the vehicle photo.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("cannot read image `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported image type `{0}` (use JPG, JPEG or PNG)")]
    UnsupportedType(String),
    #[error("image is {size} bytes, above the {limit} byte upload limit")]
    TooLarge { size: u64, limit: u64 },
}

/// Failures while building or relaying the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("invalid address `{address}`: {reason}")]
    Address { address: String, reason: String },
    #[error("could not build message: {0}")]
    Message(String),
    #[error("attachment rejected: {0}")]
    Attachment(String),
    #[error("mail relay error: {0}")]
    Relay(String),
    #[error("outbox error: {0}")]
    Outbox(String),
}

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Broad classes used to decide how an error is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
    Transport,
    Navigation,
}

/// Unified error for one submission attempt or page transition.
#[derive(Debug, Error)]
pub enum InquiryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("email not configured: set EMAIL and PASSWORD before submitting")]
    NotConfigured,
    #[error("failed to send inquiry: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

const SMTP_TROUBLESHOOTING: &str = "Troubleshooting tips:
- Make sure you're using a Gmail App Password, not your regular password
- Enable 2-Step Verification in your Google Account
- Generate an App Password from: https://myaccount.google.com/apppasswords
- Check your internet connection";

const MESSAGE_REJECTED: &str =
    "The email could not be assembled. Check the sender (EMAIL) and the configured recipient address.";

const ATTACHMENT_REJECTED: &str =
    "The vehicle photo could not be attached. Remove it or choose a JPG/PNG file and try again.";

const OUTBOX_UNWRITABLE: &str =
    "The outbox directory is not writable. Check LEASING_INQUIRY_OUTBOX or `outbox_dir` in config.json.";

const CONFIGURE_EMAIL: &str =
    "Set the EMAIL and PASSWORD environment variables (sender address and app password) and restart.";

impl InquiryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InquiryError::Validation(_) => ErrorKind::Validation,
            InquiryError::NotConfigured => ErrorKind::Configuration,
            InquiryError::Transport(_) => ErrorKind::Transport,
            InquiryError::Navigation(_) => ErrorKind::Navigation,
        }
    }

    /// Guidance shown under the error message, when there is any.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            InquiryError::NotConfigured => Some(CONFIGURE_EMAIL),
            InquiryError::Transport(TransportError::Address { .. })
            | InquiryError::Transport(TransportError::Message(_)) => Some(MESSAGE_REJECTED),
            InquiryError::Transport(TransportError::Attachment(_)) => Some(ATTACHMENT_REJECTED),
            InquiryError::Transport(TransportError::Outbox(_)) => Some(OUTBOX_UNWRITABLE),
            InquiryError::Transport(TransportError::Relay(_)) => Some(SMTP_TROUBLESHOOTING),
            _ => None,
        }
    }
}

/// Top-level error surfaced by the binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Inquiry(#[from] InquiryError),
}
