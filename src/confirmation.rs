//! Structured summary shown after a successful submission.

use crate::i18n::Language;
use crate::inquiry::format::{format_lkr, format_tenure};
use crate::session::SubmittedInquiry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

impl SummaryRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationView {
    pub vehicle: Vec<SummaryRow>,
    pub contact: Vec<SummaryRow>,
    pub recipient: String,
    pub subject: String,
    pub email_body: String,
    pub reference: String,
}

impl ConfirmationView {
    pub fn from_submission(submitted: &SubmittedInquiry, language: Language) -> Self {
        let strings = language.strings();
        let form = &submitted.form;
        let category = submitted.category();

        let mut category_label = category.label(language).to_string();
        if let (Some(status), Some(trim)) = (submitted.registration, submitted.trim) {
            category_label = format!(
                "{} ({}, {})",
                category_label,
                status.label(language),
                trim.label(language)
            );
        }

        let mut vehicle = vec![SummaryRow::new(strings.category, category_label)];
        if category.requires_make_model {
            vehicle.push(SummaryRow::new(strings.make, form.make.trim()));
            vehicle.push(SummaryRow::new(strings.model, form.model.trim()));
        }
        vehicle.push(SummaryRow::new(strings.yom, form.year.to_string()));
        vehicle.push(SummaryRow::new(
            strings.facility_amount,
            format_lkr(form.facility_amount),
        ));
        vehicle.push(SummaryRow::new(
            strings.tenure,
            format_tenure(form.tenure_months),
        ));
        vehicle.push(SummaryRow::new(
            strings.timeframe,
            form.timeframe.label(language),
        ));
        if let Some(image) = &form.image {
            vehicle.push(SummaryRow::new(
                strings.vehicle_image,
                format!("{} ({})", image.filename, strings.image_attached),
            ));
        }

        let contact = vec![
            SummaryRow::new(strings.name, form.name.trim()),
            SummaryRow::new(strings.email, form.customer_email().unwrap_or("-")),
            SummaryRow::new(strings.phone, form.phone.trim()),
            SummaryRow::new(strings.nearest_town, form.town.trim()),
        ];

        Self {
            vehicle,
            contact,
            recipient: submitted.result.recipient.clone(),
            subject: submitted.result.subject.clone(),
            email_body: submitted.result.body.clone(),
            reference: submitted.result.reference.to_string(),
        }
    }

    pub fn value_of(&self, label: &str) -> Option<&str> {
        self.vehicle
            .iter()
            .chain(self.contact.iter())
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}
