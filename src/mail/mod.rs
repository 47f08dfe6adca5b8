//! Composes the inquiry email and hands it to a [`MailTransport`].

pub mod transport;

use std::{env, fmt, path::PathBuf, time::Duration};

use chrono::NaiveDateTime;
use lettre::message::{
    header::ContentType, Attachment, Mailbox, Message, MultiPart, SinglePart,
};
use uuid::Uuid;

use crate::catalog::{RegistrationStatus, Trim, VehicleCategory};
use crate::errors::TransportError;
use crate::inquiry::format::{format_lkr, format_tenure};
use crate::inquiry::{ImageAttachment, InquiryForm};

pub use transport::{MailTransport, OutboxTransport, SmtpRelay};

pub const DEFAULT_RELAY_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_RELAY_PORT: u16 = 587;
pub const DEFAULT_RECIPIENT: &str = "keshara@sdb.lk";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const SENDER_ENV: &str = "EMAIL";
pub const SECRET_ENV: &str = "PASSWORD";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sender address and app password used to authenticate with the relay.
#[derive(Clone, PartialEq, Eq)]
pub struct MailCredentials {
    pub sender: String,
    pub secret: String,
}

impl MailCredentials {
    pub fn new(sender: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            secret: secret.into(),
        }
    }

    /// Reads `EMAIL` and `PASSWORD`; `None` unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let sender = env::var(SENDER_ENV).ok()?;
        let secret = env::var(SECRET_ENV).ok()?;
        if sender.trim().is_empty() || secret.is_empty() {
            return None;
        }
        Some(Self::new(sender.trim(), secret))
    }
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("sender", &self.sender)
            .field("secret", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub relay_host: String,
    pub relay_port: u16,
    pub recipient: String,
    pub timeout: Duration,
    /// When set, messages are written here as `.eml` files instead of relayed.
    pub outbox_dir: Option<PathBuf>,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            relay_host: DEFAULT_RELAY_HOST.into(),
            relay_port: DEFAULT_RELAY_PORT,
            recipient: DEFAULT_RECIPIENT.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            outbox_dir: None,
        }
    }
}

/// Subject and body of one inquiry, before a transport sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedInquiry {
    pub reference: Uuid,
    pub subject: String,
    pub body: String,
    pub reply_to: Option<String>,
}

/// Selection made before the form, as it appears in the email.
#[derive(Debug, Clone, Copy)]
pub struct VehicleSelection<'a> {
    pub category: &'a VehicleCategory,
    pub registration: Option<RegistrationStatus>,
    pub trim: Option<Trim>,
}

/// Builds the subject and plain-text body. The body is always English.
pub fn compose(
    form: &InquiryForm,
    selection: VehicleSelection<'_>,
    submitted_at: NaiveDateTime,
    reference: Uuid,
) -> ComposedInquiry {
    let category = selection.category;
    let mut lines = vec![
        "New Vehicle Leasing Inquiry".to_string(),
        String::new(),
        "Customer Information:".to_string(),
        format!("- Name: {}", form.name.trim()),
        format!("- Email: {}", form.customer_email().unwrap_or("Not provided")),
        format!("- Phone: {}", form.phone.trim()),
        format!("- Nearest Town: {}", form.town.trim()),
        String::new(),
        "Vehicle Details:".to_string(),
        format!("- Category: {}", category.name),
    ];
    if let Some(status) = selection.registration {
        lines.push(format!("- Registration Status: {status}"));
    }
    if let Some(trim) = selection.trim {
        lines.push(format!("- Vehicle Type: {trim}"));
    }
    if category.requires_make_model {
        lines.push(format!("- Make: {}", form.make.trim()));
        lines.push(format!("- Model: {}", form.model.trim()));
    }
    lines.push(format!("- Year of Manufacture (YOM): {}", form.year));
    lines.push(format!(
        "- Expected Facility Amount: {}",
        format_lkr(form.facility_amount)
    ));
    lines.push(format!(
        "- Requested Tenure: {}",
        format_tenure(form.tenure_months)
    ));
    lines.push(format!("- When Customer Needs Leasing: {}", form.timeframe));
    if form.has_image() {
        lines.push("- Vehicle Image: Attached".to_string());
    }
    lines.extend([
        String::new(),
        "Please contact the customer to discuss leasing options.".to_string(),
        String::new(),
        format!("Date of Inquiry: {}", submitted_at.format(TIMESTAMP_FORMAT)),
        format!("Reference: {reference}"),
    ]);

    ComposedInquiry {
        reference,
        subject: format!("Vehicle Leasing Inquiry - {}", category.name),
        body: lines.join("\n"),
        reply_to: form.customer_email().map(str::to_string),
    }
}

fn mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|err| TransportError::Address {
            address: address.to_string(),
            reason: err.to_string(),
        })
}

/// Assembles the MIME message: a plain-text part plus the optional photo.
pub fn build_message(
    composed: &ComposedInquiry,
    image: Option<&ImageAttachment>,
    sender: &str,
    recipient: &str,
) -> Result<Message, TransportError> {
    let mut builder = Message::builder()
        .from(mailbox(sender)?)
        .to(mailbox(recipient)?)
        .subject(composed.subject.clone());
    // A customer address lettre cannot parse only costs the Reply-To header.
    if let Some(reply_to) = &composed.reply_to {
        match mailbox(reply_to) {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(err) => tracing::warn!(
                reference = %composed.reference,
                error = %err,
                "customer address unusable as Reply-To; omitting header"
            ),
        }
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(composed.body.clone()));
    if let Some(image) = image {
        let content_type = ContentType::parse(image.content_type)
            .map_err(|err| TransportError::Attachment(err.to_string()))?;
        parts = parts.singlepart(
            Attachment::new(image.filename.clone()).body(image.data.clone(), content_type),
        );
    }

    builder
        .multipart(parts)
        .map_err(|err| TransportError::Message(err.to_string()))
}

/// Outcome of one send attempt. Subject and body are kept either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InquiryResult {
    pub reference: Uuid,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub has_attachment: bool,
    pub error: Option<TransportError>,
}

impl InquiryResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Sends composed inquiries to the configured recipient.
pub struct Mailer {
    settings: MailSettings,
    credentials: Option<MailCredentials>,
    transport: Box<dyn MailTransport>,
}

impl Mailer {
    /// Picks the outbox when `outbox_dir` is set, the SMTP relay otherwise.
    pub fn new(settings: MailSettings, credentials: Option<MailCredentials>) -> Self {
        let transport: Box<dyn MailTransport> = match &settings.outbox_dir {
            Some(dir) => Box::new(OutboxTransport::new(dir.clone())),
            None => Box::new(SmtpRelay::new(
                settings.relay_host.clone(),
                settings.relay_port,
                settings.timeout,
            )),
        };
        Self::with_transport(settings, credentials, transport)
    }

    pub fn with_transport(
        settings: MailSettings,
        credentials: Option<MailCredentials>,
        transport: Box<dyn MailTransport>,
    ) -> Self {
        Self {
            settings,
            credentials,
            transport,
        }
    }

    pub fn credentials_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn transport_name(&self) -> String {
        self.transport.describe()
    }

    pub fn send(
        &self,
        composed: &ComposedInquiry,
        image: Option<&ImageAttachment>,
    ) -> InquiryResult {
        let recipient = self.settings.recipient.clone();
        let outcome = self.deliver(composed, image, &recipient);
        match &outcome {
            Ok(()) => tracing::info!(
                reference = %composed.reference,
                transport = %self.transport.describe(),
                "inquiry email sent"
            ),
            Err(err) => tracing::warn!(
                reference = %composed.reference,
                error = %err,
                "inquiry email failed"
            ),
        }
        InquiryResult {
            reference: composed.reference,
            recipient,
            subject: composed.subject.clone(),
            body: composed.body.clone(),
            has_attachment: image.is_some(),
            error: outcome.err(),
        }
    }

    fn deliver(
        &self,
        composed: &ComposedInquiry,
        image: Option<&ImageAttachment>,
        recipient: &str,
    ) -> Result<(), TransportError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| TransportError::Relay("no sender credentials".into()))?;
        let message = build_message(composed, image, &credentials.sender, recipient)?;
        self.transport.send(&message, credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{get, CategoryId};
    use chrono::NaiveDate;
    use insta::assert_snapshot;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .and_then(|date| date.and_hms_opt(9, 30, 5))
            .unwrap()
    }

    fn sample_form() -> InquiryForm {
        let mut form = InquiryForm::new(get(CategoryId::CarPrivate), 2026);
        form.make = "Toyota".into();
        form.model = "Aqua".into();
        form.year = 2023;
        form.facility_amount = 1_500_000.0;
        form.tenure_months = 48;
        form.name = "Nimal Perera".into();
        form.phone = "0771234567".into();
        form.town = "Kandy".into();
        form
    }

    fn car_selection() -> VehicleSelection<'static> {
        VehicleSelection {
            category: get(CategoryId::CarPrivate),
            registration: Some(RegistrationStatus::Registered),
            trim: Some(Trim::Luxury),
        }
    }

    #[test]
    fn body_lists_every_field() {
        let composed = compose(&sample_form(), car_selection(), fixed_time(), Uuid::nil());
        assert_eq!(
            composed.subject,
            "Vehicle Leasing Inquiry - Car and Private Vehicles"
        );
        assert_eq!(composed.reply_to, None);
        assert_snapshot!(composed.body, @r###"
        New Vehicle Leasing Inquiry

        Customer Information:
        - Name: Nimal Perera
        - Email: Not provided
        - Phone: 0771234567
        - Nearest Town: Kandy

        Vehicle Details:
        - Category: Car and Private Vehicles
        - Registration Status: Registered
        - Vehicle Type: Luxury
        - Make: Toyota
        - Model: Aqua
        - Year of Manufacture (YOM): 2023
        - Expected Facility Amount: LKR 1,500,000.00
        - Requested Tenure: 48 months (4.0 years)
        - When Customer Needs Leasing: Immediately

        Please contact the customer to discuss leasing options.

        Date of Inquiry: 2026-03-14 09:30:05
        Reference: 00000000-0000-0000-0000-000000000000
        "###);
    }

    #[test]
    fn three_wheeler_body_skips_vehicle_identification() {
        let mut form = sample_form();
        form.make.clear();
        form.model.clear();
        form.email = " nimal@example.lk ".into();
        let selection = VehicleSelection {
            category: get(CategoryId::ThreeWheeler),
            registration: None,
            trim: None,
        };
        let composed = compose(&form, selection, fixed_time(), Uuid::nil());
        assert!(!composed.body.contains("Make:"));
        assert!(!composed.body.contains("Registration Status"));
        assert!(composed.body.contains("- Email: nimal@example.lk"));
        assert_eq!(composed.reply_to.as_deref(), Some("nimal@example.lk"));
    }

    #[test]
    fn message_carries_reply_to_and_attachment() {
        let mut form = sample_form();
        form.email = "nimal@example.lk".into();
        form.image = Some(ImageAttachment::new("aqua.jpg", vec![0xFF, 0xD8, 0xFF]).unwrap());
        let composed = compose(&form, car_selection(), fixed_time(), Uuid::nil());
        assert!(composed.body.contains("- Vehicle Image: Attached"));

        let message = build_message(
            &composed,
            form.image.as_ref(),
            "sender@example.com",
            DEFAULT_RECIPIENT,
        )
        .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Reply-To: nimal@example.lk"));
        assert!(raw.contains("To: keshara@sdb.lk"));
        assert!(raw.contains("image/jpeg"));
        assert!(raw.contains("aqua.jpg"));
    }

    #[test]
    fn unparseable_customer_address_drops_reply_to() {
        let mut form = sample_form();
        form.email = "nimal.perera@".into();
        let composed = compose(&form, car_selection(), fixed_time(), Uuid::nil());
        assert_eq!(composed.reply_to.as_deref(), Some("nimal.perera@"));

        let message =
            build_message(&composed, None, "sender@example.com", DEFAULT_RECIPIENT).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(!raw.contains("Reply-To"));
        assert!(raw.contains("To: keshara@sdb.lk"));
    }

    #[test]
    fn invalid_sender_is_an_address_error() {
        let composed = compose(&sample_form(), car_selection(), fixed_time(), Uuid::nil());
        let err = build_message(&composed, None, "not an address", DEFAULT_RECIPIENT)
            .unwrap_err();
        assert!(matches!(err, TransportError::Address { .. }));
    }

    #[test]
    fn credentials_debug_hides_secret() {
        let credentials = MailCredentials::new("sender@example.com", "app-pass");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("sender@example.com"));
        assert!(!rendered.contains("app-pass"));
    }
}
