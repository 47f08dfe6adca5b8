//! Page flow for one inquiry: `Welcome → Subcategory → InquiryForm → Confirmation`.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

use crate::catalog::{self, CategoryId, RegistrationStatus, Trim, VehicleCategory};
use crate::errors::{InquiryError, NavigationError};
use crate::i18n::Language;
use crate::inquiry::{self, InquiryForm};
use crate::mail::{self, InquiryResult, Mailer, VehicleSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Welcome,
    Subcategory,
    InquiryForm,
    Confirmation,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Page::Welcome => "welcome",
            Page::Subcategory => "subcategory",
            Page::InquiryForm => "inquiry form",
            Page::Confirmation => "confirmation",
        };
        f.write_str(label)
    }
}

/// Everything the confirmation page needs after a successful send.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedInquiry {
    pub category: CategoryId,
    pub registration: Option<RegistrationStatus>,
    pub trim: Option<Trim>,
    pub form: InquiryForm,
    pub result: InquiryResult,
    pub submitted_at: NaiveDateTime,
}

impl SubmittedInquiry {
    pub fn category(&self) -> &'static VehicleCategory {
        catalog::get(self.category)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InquirySession {
    page: Page,
    language: Language,
    category: Option<CategoryId>,
    registration: Option<RegistrationStatus>,
    trim: Option<Trim>,
    draft: Option<InquiryForm>,
    submitted: Option<SubmittedInquiry>,
}

impl InquirySession {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn category(&self) -> Option<&'static VehicleCategory> {
        self.category.map(catalog::get)
    }

    pub fn registration(&self) -> Option<RegistrationStatus> {
        self.registration
    }

    pub fn trim(&self) -> Option<Trim> {
        self.trim
    }

    /// Form entered during the last failed submission, if any.
    pub fn draft(&self) -> Option<&InquiryForm> {
        self.draft.as_ref()
    }

    pub fn submitted(&self) -> Option<&SubmittedInquiry> {
        self.submitted.as_ref()
    }

    /// Starting values for the form page: the retained draft or fresh defaults.
    pub fn form_defaults(&self, current_year: i32) -> Option<InquiryForm> {
        if let Some(draft) = &self.draft {
            return Some(draft.clone());
        }
        self.category()
            .map(|category| InquiryForm::new(category, current_year))
    }

    pub fn select_category(&mut self, id: CategoryId) -> Result<Page, NavigationError> {
        self.expect_page("select category", Page::Welcome)?;
        let category = catalog::get(id);
        self.category = Some(id);
        self.registration = None;
        self.trim = None;
        self.draft = None;
        self.page = if category.has_subcategory {
            Page::Subcategory
        } else {
            Page::InquiryForm
        };
        tracing::info!(category = id.slug(), page = %self.page, "category selected");
        Ok(self.page)
    }

    pub fn select_registration(
        &mut self,
        status: RegistrationStatus,
    ) -> Result<Page, NavigationError> {
        self.expect_page("select registration", Page::Subcategory)?;
        let category = self.category().ok_or(NavigationError::CategoryNotSelected)?;
        if !category.has_subcategory {
            return Err(NavigationError::NoSubSelection(category.name));
        }
        self.registration = Some(status);
        self.trim = None;
        tracing::debug!(registration = status.as_str(), "registration selected");
        Ok(self.page)
    }

    pub fn select_trim(&mut self, trim: Trim) -> Result<Page, NavigationError> {
        self.expect_page("select vehicle type", Page::Subcategory)?;
        if self.registration.is_none() {
            return Err(NavigationError::RegistrationNotSelected);
        }
        self.trim = Some(trim);
        self.page = Page::InquiryForm;
        tracing::info!(trim = trim.as_str(), "vehicle type selected");
        Ok(self.page)
    }

    pub fn back(&mut self) -> Result<Page, NavigationError> {
        match self.page {
            Page::Subcategory => {
                self.clear_selection();
                self.page = Page::Welcome;
            }
            Page::InquiryForm => {
                let has_subcategory = self
                    .category()
                    .map(|category| category.has_subcategory)
                    .unwrap_or(false);
                self.draft = None;
                if has_subcategory {
                    self.trim = None;
                    self.page = Page::Subcategory;
                } else {
                    self.clear_selection();
                    self.page = Page::Welcome;
                }
            }
            page => {
                return Err(NavigationError::WrongPage {
                    action: "back",
                    page,
                })
            }
        }
        tracing::debug!(page = %self.page, "navigated back");
        Ok(self.page)
    }

    /// Validates and sends `form`. Any failure keeps the session on the form
    /// page with `form` retained as the draft.
    pub fn submit(&mut self, form: InquiryForm, mailer: &Mailer) -> Result<Page, InquiryError> {
        self.submit_at(form, mailer, Local::now().naive_local(), Uuid::new_v4())
    }

    pub fn submit_at(
        &mut self,
        form: InquiryForm,
        mailer: &Mailer,
        submitted_at: NaiveDateTime,
        reference: Uuid,
    ) -> Result<Page, InquiryError> {
        self.expect_page("submit", Page::InquiryForm)?;
        let category = self.category().ok_or(NavigationError::CategoryNotSelected)?;
        if category.has_subcategory {
            self.registration
                .ok_or(NavigationError::RegistrationNotSelected)?;
            self.trim.ok_or(NavigationError::TrimNotSelected)?;
        }

        if let Err(err) = inquiry::validate(&form, category, mailer.credentials_configured()) {
            tracing::warn!(error = %err, "inquiry rejected");
            self.draft = Some(form);
            return Err(err);
        }

        let selection = VehicleSelection {
            category,
            registration: self.registration,
            trim: self.trim,
        };
        let composed = mail::compose(&form, selection, submitted_at, reference);
        let result = mailer.send(&composed, form.image.as_ref());
        if let Some(err) = result.error.clone() {
            self.draft = Some(form);
            return Err(err.into());
        }

        self.submitted = Some(SubmittedInquiry {
            category: category.id,
            registration: self.registration,
            trim: self.trim,
            form,
            result,
            submitted_at,
        });
        self.draft = None;
        self.page = Page::Confirmation;
        tracing::info!(%reference, category = category.id.slug(), "inquiry submitted");
        Ok(self.page)
    }

    /// Keeps `form` as the draft after a failure outside the validator,
    /// such as a photo that could not be read.
    pub fn keep_draft(&mut self, form: InquiryForm) {
        if self.page == Page::InquiryForm {
            self.draft = Some(form);
        }
    }

    /// Starts a new inquiry from the welcome page.
    pub fn reset(&mut self) -> Page {
        self.clear_selection();
        self.page = Page::Welcome;
        tracing::debug!("session reset");
        self.page
    }

    fn clear_selection(&mut self) {
        self.category = None;
        self.registration = None;
        self.trim = None;
        self.draft = None;
        self.submitted = None;
    }

    fn expect_page(&self, action: &'static str, expected: Page) -> Result<(), NavigationError> {
        if self.page == expected {
            Ok(())
        } else {
            Err(NavigationError::WrongPage {
                action,
                page: self.page,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::categories;
    use crate::errors::ValidationError;
    use crate::mail::{MailSettings, OutboxTransport};

    fn filled(category: CategoryId) -> InquiryForm {
        let mut form = InquiryForm::new(catalog::get(category), 2026);
        form.make = "Toyota".into();
        form.model = "Aqua".into();
        form.name = "Nimal".into();
        form.phone = "0771234567".into();
        form.town = "Kandy".into();
        form
    }

    fn unconfigured_mailer() -> Mailer {
        Mailer::new(MailSettings::default(), None)
    }

    #[test]
    fn categories_without_sub_selection_skip_the_subcategory_page() {
        for category in categories() {
            let mut session = InquirySession::default();
            let page = session.select_category(category.id).unwrap();
            if category.has_subcategory {
                assert_eq!(page, Page::Subcategory);
            } else {
                assert_eq!(page, Page::InquiryForm);
                assert_eq!(session.back().unwrap(), Page::Welcome);
                assert!(session.category().is_none());
            }
        }
    }

    #[test]
    fn form_requires_registration_and_trim() {
        for category in categories().iter().filter(|c| c.has_subcategory) {
            let mut session = InquirySession::default();
            session.select_category(category.id).unwrap();
            assert_eq!(
                session.select_trim(Trim::Normal),
                Err(NavigationError::RegistrationNotSelected),
                "{}",
                category.name
            );
            assert_eq!(session.page(), Page::Subcategory);

            session
                .select_registration(RegistrationStatus::Unregistered)
                .unwrap();
            assert_eq!(session.page(), Page::Subcategory, "{}", category.name);
            assert!(matches!(
                session.submit(filled(category.id), &unconfigured_mailer()),
                Err(InquiryError::Navigation(NavigationError::WrongPage { .. }))
            ));
            assert_eq!(session.select_trim(Trim::Normal).unwrap(), Page::InquiryForm);
        }
    }

    #[test]
    fn keep_draft_only_applies_on_the_form_page() {
        let mut session = InquirySession::default();
        session.keep_draft(filled(CategoryId::ThreeWheeler));
        assert!(session.draft().is_none());

        session.select_category(CategoryId::ThreeWheeler).unwrap();
        let form = filled(CategoryId::ThreeWheeler);
        session.keep_draft(form.clone());
        assert_eq!(session.form_defaults(2026), Some(form));
    }

    #[test]
    fn choosing_registration_again_clears_trim() {
        let mut session = InquirySession::default();
        session.select_category(CategoryId::PassengerBus).unwrap();
        session
            .select_registration(RegistrationStatus::Registered)
            .unwrap();
        session.select_trim(Trim::Luxury).unwrap();
        assert_eq!(session.back().unwrap(), Page::Subcategory);
        assert_eq!(session.trim(), None);
        assert_eq!(session.registration(), Some(RegistrationStatus::Registered));

        session
            .select_registration(RegistrationStatus::Unregistered)
            .unwrap();
        assert_eq!(session.trim(), None);
    }

    #[test]
    fn back_is_rejected_on_welcome() {
        let mut session = InquirySession::default();
        assert!(matches!(
            session.back(),
            Err(NavigationError::WrongPage {
                action: "back",
                page: Page::Welcome
            })
        ));
    }

    #[test]
    fn select_category_only_from_welcome() {
        let mut session = InquirySession::default();
        session.select_category(CategoryId::Commercial).unwrap();
        assert!(session.select_category(CategoryId::Van).is_err());
        assert_eq!(session.category().map(|c| c.id), Some(CategoryId::Commercial));
    }

    #[test]
    fn failed_submission_retains_the_draft() {
        let mut session = InquirySession::default();
        session.select_category(CategoryId::ThreeWheeler).unwrap();
        let mut form = filled(CategoryId::ThreeWheeler);
        form.phone.clear();

        let err = session.submit(form.clone(), &unconfigured_mailer()).unwrap_err();
        assert!(matches!(
            err,
            InquiryError::Validation(ValidationError::MissingRequiredFields)
        ));
        assert_eq!(session.page(), Page::InquiryForm);
        assert_eq!(session.draft(), Some(&form));
        assert_eq!(session.form_defaults(2026), Some(form));
    }

    #[test]
    fn missing_credentials_block_submission() {
        let mut session = InquirySession::default();
        session.select_category(CategoryId::ThreeWheeler).unwrap();
        let err = session
            .submit(filled(CategoryId::ThreeWheeler), &unconfigured_mailer())
            .unwrap_err();
        assert!(matches!(err, InquiryError::NotConfigured));
        assert!(session.submitted().is_none());
    }

    #[test]
    fn successful_submission_moves_to_confirmation_and_reset_clears() {
        let dir = tempfile::tempdir().unwrap();
        let mailer = Mailer::with_transport(
            MailSettings::default(),
            Some(crate::mail::MailCredentials::new("sender@example.com", "secret")),
            Box::new(OutboxTransport::new(dir.path().to_path_buf())),
        );
        let mut session = InquirySession::default();
        session.select_category(CategoryId::CarPrivate).unwrap();
        session
            .select_registration(RegistrationStatus::Registered)
            .unwrap();
        session.select_trim(Trim::Luxury).unwrap();

        let page = session.submit(filled(CategoryId::CarPrivate), &mailer).unwrap();
        assert_eq!(page, Page::Confirmation);
        let submitted = session.submitted().unwrap();
        assert!(submitted.result.is_success());
        assert!(submitted.result.body.contains("Luxury"));
        assert!(session.back().is_err());

        assert_eq!(session.reset(), Page::Welcome);
        assert!(session.submitted().is_none());
        assert!(session.category().is_none());
    }
}
