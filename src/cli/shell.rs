use std::io;

use chrono::{Datelike, Local};

use crate::catalog::{self, CategoryId, RegistrationStatus, Trim, VehicleCategory};
use crate::cli::forms::{FormEngine, FormResult, InquiryWizard, WizardError, WizardInteraction};
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::ui::formatting::Formatter;
use crate::cli::ui::menu_renderer::{MenuRenderError, MenuRenderer, MenuUI, MenuUIItem};
use crate::config::{Config, ConfigManager};
use crate::confirmation::{ConfirmationView, SummaryRow};
use crate::errors::{CliError, ErrorKind, InquiryError, NavigationError};
use crate::i18n::Language;
use crate::inquiry::InquiryForm;
use crate::mail::{MailCredentials, Mailer};
use crate::session::{InquirySession, Page};

const LANGUAGE_KEY: &str = "__language";
const BACK_KEY: &str = "__back";
const EXIT_KEY: &str = "__exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// Runs the page loop until the user leaves from the welcome or confirmation page.
pub fn run_cli() -> Result<(), CliError> {
    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    output::set_preferences(OutputPreferences::resolve(config.plain_output));

    let mailer = Mailer::new(config.mail_settings(), MailCredentials::from_env());
    if !mailer.credentials_configured() {
        tracing::warn!("mail credentials missing; submissions will be refused");
    }
    tracing::info!(transport = %mailer.transport_name(), "leasing assistant started");

    let mut shell = Shell::new(manager, config, mailer);
    shell.run()
}

struct Shell {
    manager: ConfigManager,
    config: Config,
    mailer: Mailer,
    session: InquirySession,
    formatter: Formatter,
}

impl Shell {
    fn new(manager: ConfigManager, config: Config, mailer: Mailer) -> Self {
        let session = InquirySession::new(config.language);
        Self {
            manager,
            config,
            mailer,
            session,
            formatter: Formatter::new(),
        }
    }

    fn run(&mut self) -> Result<(), CliError> {
        loop {
            let control = match self.session.page() {
                Page::Welcome => self.welcome_page()?,
                Page::Subcategory => self.subcategory_page()?,
                Page::InquiryForm => self.inquiry_page()?,
                Page::Confirmation => self.confirmation_page()?,
            };
            if control == LoopControl::Exit {
                output::info("Goodbye.");
                return Ok(());
            }
        }
    }

    fn language(&self) -> Language {
        self.session.language()
    }

    fn welcome_page(&mut self) -> Result<LoopControl, CliError> {
        let language = self.language();
        let strings = language.strings();

        let mut items: Vec<MenuUIItem> = catalog::categories()
            .iter()
            .map(|category| {
                MenuUIItem::new(
                    category.id.slug(),
                    format!("{} {}", category.icon, category.label(language)),
                    format!("Up to {} months", category.max_tenure_months),
                )
            })
            .collect();
        items.push(MenuUIItem::new(
            LANGUAGE_KEY,
            strings.language,
            language.toggled().native_name(),
        ));
        items.push(MenuUIItem::new(EXIT_KEY, strings.exit, ""));

        let context = format!(
            "{}\n{}\n\n{}",
            strings.welcome_title, strings.welcome_subtitle, strings.find_plan
        );
        let menu = MenuUI::new(strings.select_category, items).with_context(context);

        match show_menu(&menu)? {
            Some(key) if key == LANGUAGE_KEY => {
                self.toggle_language()?;
                Ok(LoopControl::Continue)
            }
            Some(key) if key == EXIT_KEY => self.confirm_exit(),
            None => self.confirm_exit(),
            Some(slug) => {
                let id = CategoryId::from_slug(&slug)
                    .ok_or_else(|| InquiryError::from(NavigationError::UnknownCategory(slug)))?;
                self.session
                    .select_category(id)
                    .map_err(InquiryError::from)?;
                Ok(LoopControl::Continue)
            }
        }
    }

    fn subcategory_page(&mut self) -> Result<LoopControl, CliError> {
        let language = self.language();
        let strings = language.strings();
        let category = self.current_category()?;
        let context = format!("{} {}", category.icon, category.label(language));

        let mut items: Vec<MenuUIItem> = RegistrationStatus::ALL
            .iter()
            .map(|status| MenuUIItem::new(status.as_str(), status.label(language), ""))
            .collect();
        items.push(MenuUIItem::new(BACK_KEY, format!("← {}", strings.back), ""));
        let menu = MenuUI::new(strings.select_registration, items).with_context(context.clone());

        let status = show_menu(&menu)?.and_then(|key| {
            RegistrationStatus::ALL
                .into_iter()
                .find(|status| status.as_str() == key)
        });
        let Some(status) = status else {
            self.go_back()?;
            return Ok(LoopControl::Continue);
        };
        self.session
            .select_registration(status)
            .map_err(InquiryError::from)?;

        let mut items: Vec<MenuUIItem> = Trim::ALL
            .iter()
            .map(|trim| MenuUIItem::new(trim.as_str(), trim.label(language), ""))
            .collect();
        items.push(MenuUIItem::new(BACK_KEY, format!("← {}", strings.back), ""));
        let context = format!("{context} · {}", status.label(language));
        let menu = MenuUI::new(strings.select_type, items).with_context(context);

        let trim = show_menu(&menu)?
            .and_then(|key| Trim::ALL.into_iter().find(|trim| trim.as_str() == key));
        match trim {
            Some(trim) => {
                self.session.select_trim(trim).map_err(InquiryError::from)?;
            }
            None => self.go_back()?,
        }
        Ok(LoopControl::Continue)
    }

    fn inquiry_page(&mut self) -> Result<LoopControl, CliError> {
        let language = self.language();
        let strings = language.strings();
        let category = self.current_category()?;
        let current_year = Local::now().year();
        let initial = self
            .session
            .form_defaults(current_year)
            .unwrap_or_else(|| InquiryForm::new(category, current_year));

        let mut heading = format!("{} {}", category.icon, category.label(language));
        if let (Some(status), Some(trim)) = (self.session.registration(), self.session.trim()) {
            heading = format!(
                "{heading} ({}, {})",
                status.label(language),
                trim.label(language)
            );
        }
        self.formatter.print_header(heading);

        let wizard = InquiryWizard::new(
            category,
            language,
            current_year,
            &initial,
            self.config.max_attachment_bytes,
        );
        let mut interaction = WizardInteraction::new();
        match FormEngine::new(&wizard).run(&mut interaction) {
            Ok(FormResult::Completed(form)) => {
                output::info(strings.sending);
                match self.session.submit(form, &self.mailer) {
                    Ok(_) => output::success(strings.inquiry_sent),
                    Err(err) => self.report_error(&err),
                }
            }
            Ok(FormResult::Cancelled) | Err(WizardError::Cancelled) => self.go_back()?,
            Err(WizardError::Attachment { source, form }) => {
                cli_io::print_error(source);
                self.session.keep_draft(*form);
            }
            Err(err) => cli_io::print_error(err),
        }
        Ok(LoopControl::Continue)
    }

    fn confirmation_page(&mut self) -> Result<LoopControl, CliError> {
        let language = self.language();
        let strings = language.strings();
        let Some(submitted) = self.session.submitted() else {
            self.session.reset();
            return Ok(LoopControl::Continue);
        };
        let view = ConfirmationView::from_submission(submitted, language);

        output::success(strings.thank_you);
        self.formatter.print_detail(strings.inquiry_submitted);
        self.formatter.print_header(strings.inquiry_summary);
        output::section(strings.vehicle_details);
        self.print_rows(&view.vehicle);
        output::section(strings.contact_details);
        self.print_rows(&view.contact);
        self.formatter
            .print_detail(format!("{}: {}", strings.sent_to, view.recipient));

        loop {
            let items = vec![
                MenuUIItem::new("view", strings.view_email, view.subject.clone()),
                MenuUIItem::new("another", strings.submit_another, ""),
                MenuUIItem::new("home", strings.back_home, ""),
                MenuUIItem::new(EXIT_KEY, strings.exit, ""),
            ];
            let menu = MenuUI::new(strings.inquiry_sent, items)
                .with_context(format!("Reference: {}", view.reference));
            match show_menu(&menu)?.as_deref() {
                Some("view") => {
                    self.formatter.print_header(&view.subject);
                    println!("{}", view.email_body);
                }
                Some("another") | Some("home") => {
                    self.session.reset();
                    return Ok(LoopControl::Continue);
                }
                Some(_) | None => {
                    if self.confirm_exit()? == LoopControl::Exit {
                        return Ok(LoopControl::Exit);
                    }
                }
            }
        }
    }

    fn print_rows(&self, rows: &[SummaryRow]) {
        let pairs: Vec<(&str, &str)> = rows
            .iter()
            .map(|row| (row.label.as_str(), row.value.as_str()))
            .collect();
        self.formatter.print_rows(&pairs);
    }

    fn current_category(&self) -> Result<&'static VehicleCategory, CliError> {
        self.session
            .category()
            .ok_or_else(|| InquiryError::from(NavigationError::CategoryNotSelected).into())
    }

    fn go_back(&mut self) -> Result<(), CliError> {
        self.session.back().map_err(InquiryError::from)?;
        Ok(())
    }

    fn toggle_language(&mut self) -> Result<(), CliError> {
        let language = self.language().toggled();
        self.session.set_language(language);
        self.config.language = language;
        self.manager.save(&self.config)?;
        tracing::info!(language = language.native_name(), "language changed");
        Ok(())
    }

    fn confirm_exit(&self) -> Result<LoopControl, CliError> {
        if cli_io::confirm_action("Exit the leasing assistant?", true)? {
            Ok(LoopControl::Exit)
        } else {
            Ok(LoopControl::Continue)
        }
    }

    fn report_error(&self, err: &InquiryError) {
        let message = self.language().strings().error_message(err);
        match err.kind() {
            // The form comes straight back prefilled, so the user only needs a nudge.
            ErrorKind::Validation => cli_io::print_warning(message),
            ErrorKind::Configuration | ErrorKind::Transport | ErrorKind::Navigation => {
                cli_io::print_error(message);
                if let Some(hint) = err.remediation() {
                    self.formatter.print_detail(hint);
                }
            }
        }
    }
}

/// Shows `menu`; Ctrl+C and Ctrl+D count as dismissing it.
fn show_menu(menu: &MenuUI) -> Result<Option<String>, CliError> {
    match MenuRenderer::new().show(menu) {
        Ok(selection) => Ok(selection),
        Err(MenuRenderError::Interrupted | MenuRenderError::EndOfInput) => Ok(None),
        Err(err) => Err(io::Error::from(err).into()),
    }
}
