//! Step-by-step form engine and the inquiry wizard built on it.
//!
//! A [`FormFlow`] describes its fields and turns the collected strings into a
//! typed value; [`FormEngine`] walks the fields through a [`FormInteraction`],
//! handling back/help/keep and the final review step.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::catalog::VehicleCategory;
use crate::cli::io;
use crate::cli::ui::formatting::Formatter;
use crate::cli::ui::prompts::{
    choice_menu, confirm_menu, text_input, ChoicePromptResult, ConfirmationPromptResult,
    TextPromptResult,
};
use crate::errors::AttachmentError;
use crate::i18n::Language;
use crate::inquiry::{
    self, ImageAttachment, InquiryForm, Timeframe, FACILITY_AMOUNT_STEP, MAX_FACILITY_AMOUNT,
    MIN_FACILITY_AMOUNT,
};
use crate::inquiry::format::format_amount;

/// High-level lifecycle states emitted by the form runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult<T> {
    Completed(T),
    Cancelled,
}

/// Describes how prompts can be answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// User supplied a concrete value.
    Value(String),
    /// User chose to keep the default/current value.
    Keep,
    /// Abort the entire wizard immediately.
    Cancel,
    /// Go back to the previous field.
    Back,
    /// Request additional information for the current field.
    Help,
}

/// Responses accepted when reviewing the collected data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Confirm,
    Back,
    Cancel,
}

/// Field-level rejection shown inline before re-prompting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    Decimal,
    Choice(Vec<String>),
}

type ValidatorCallback = dyn Fn(&str) -> Result<String, String> + Send + Sync;
type SharedValidatorCallback = Arc<ValidatorCallback>;

#[derive(Clone)]
pub enum Validator {
    None,
    Custom(SharedValidatorCallback),
}

impl Validator {
    fn validate(&self, input: &str) -> Result<String, FieldError> {
        match self {
            Validator::None => Ok(input.trim().to_string()),
            Validator::Custom(func) => func(input).map_err(FieldError::new),
        }
    }
}

/// Declarative description of a single form field.
#[derive(Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: Option<String>,
    pub validator: Validator,
}

impl FieldDescriptor {
    pub fn new(
        key: &'static str,
        label: &'static str,
        kind: FieldKind,
        validator: Validator,
    ) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
            help: None,
            validator,
        }
    }

    pub fn with_optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Field order for one wizard.
pub struct FormDescriptor {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }
}

/// Menu choices that also accept the option number or its plain label.
#[derive(Clone)]
struct ChoiceMapper<T: Clone + PartialEq + Send + Sync> {
    display: Vec<String>,
    values: Vec<T>,
    alias_to_index: HashMap<String, usize>,
}

impl<T: Clone + PartialEq + Send + Sync> ChoiceMapper<T> {
    fn from_pairs(pairs: Vec<(String, T)>) -> Self {
        let mut display = Vec::new();
        let mut values = Vec::new();
        let mut alias_to_index = HashMap::new();

        for (idx, (label, value)) in pairs.into_iter().enumerate() {
            let display_label = format!("[{}] {}", idx + 1, label);
            // Labels win over option numbers: "12" is the 12-month tenure, not option 12.
            alias_to_index.insert(label.to_lowercase(), idx);
            alias_to_index.entry((idx + 1).to_string()).or_insert(idx);
            alias_to_index.insert(display_label.to_lowercase(), idx);
            display.push(display_label);
            values.push(value);
        }

        Self {
            display,
            values,
            alias_to_index,
        }
    }

    fn options(&self) -> Vec<String> {
        self.display.clone()
    }

    fn resolve(&self, input: &str) -> Option<String> {
        self.alias_to_index
            .get(&input.trim().to_lowercase())
            .map(|index| self.display[*index].clone())
    }

    fn value_for_display(&self, display: &str) -> Option<&T> {
        self.display
            .iter()
            .position(|candidate| candidate == display)
            .and_then(|index| self.values.get(index))
    }

    fn display_for_value(&self, value: &T) -> Option<String> {
        self.values
            .iter()
            .position(|candidate| candidate == value)
            .map(|index| self.display[index].clone())
    }
}

fn make_choice_validator<T: Clone + PartialEq + Send + Sync + 'static>(
    mapper: ChoiceMapper<T>,
    field_label: &'static str,
) -> Validator {
    let options = mapper.options();
    Validator::Custom(Arc::new(move |input| {
        mapper.resolve(input).ok_or_else(|| {
            format!(
                "Select a valid {} (options: {})",
                field_label,
                options.join(", ")
            )
        })
    }))
}

fn make_amount_validator() -> Validator {
    Validator::Custom(Arc::new(|input| {
        let cleaned: String = input
            .trim()
            .trim_start_matches("LKR")
            .chars()
            .filter(|ch| !matches!(ch, ',' | ' '))
            .collect();
        let amount = cleaned
            .parse::<f64>()
            .map_err(|_| "Enter a numeric amount (e.g., 1500000)".to_string())?;
        if inquiry::accepts_amount(amount) {
            Ok(format!("{amount:.0}"))
        } else {
            Err(format!(
                "Enter an amount between {} and {} in steps of {}",
                format_amount(MIN_FACILITY_AMOUNT),
                format_amount(MAX_FACILITY_AMOUNT),
                format_amount(FACILITY_AMOUNT_STEP)
            ))
        }
    }))
}

fn make_image_validator(max_bytes: u64) -> Validator {
    Validator::Custom(Arc::new(move |input| {
        let path = input.trim().trim_matches(|ch| ch == '"' || ch == '\'');
        if path.is_empty() {
            return Ok(String::new());
        }
        ImageAttachment::inspect(Path::new(path), max_bytes)
            .map(|_| path.to_string())
            .map_err(|err| err.to_string())
    }))
}

/// Failures turning collected answers into an [`InquiryForm`].
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("inquiry form cancelled")]
    Cancelled,
    /// The photo could not be read; `form` holds everything else that was entered.
    #[error("{source}")]
    Attachment {
        #[source]
        source: AttachmentError,
        form: Box<InquiryForm>,
    },
    #[error("invalid value for {0}")]
    InvalidField(&'static str),
}

/// Inquiry page fields for one category, prefilled from a draft or defaults.
pub struct InquiryWizard {
    descriptor: FormDescriptor,
    defaults: BTreeMap<String, String>,
    max_attachment_bytes: u64,
    existing_image: Option<ImageAttachment>,
    year_choices: ChoiceMapper<i32>,
    tenure_choices: ChoiceMapper<u32>,
    timeframe_choices: ChoiceMapper<Timeframe>,
}

impl InquiryWizard {
    pub fn new(
        category: &VehicleCategory,
        language: Language,
        current_year: i32,
        initial: &InquiryForm,
        max_attachment_bytes: u64,
    ) -> Self {
        let strings = language.strings();

        let year_choices = ChoiceMapper::from_pairs(
            inquiry::year_options(current_year)
                .into_iter()
                .map(|year| (year.to_string(), year))
                .collect(),
        );
        let tenure_choices = ChoiceMapper::from_pairs(
            category
                .tenure_options()
                .into_iter()
                .map(|months| (months.to_string(), months))
                .collect(),
        );
        let timeframe_choices = ChoiceMapper::from_pairs(
            Timeframe::ALL
                .iter()
                .map(|timeframe| (timeframe.label(language).to_string(), *timeframe))
                .collect(),
        );

        let mut fields = Vec::new();
        if category.requires_make_model {
            fields.push(
                FieldDescriptor::new("make", strings.make, FieldKind::Text, Validator::None)
                    .with_optional()
                    .with_help(strings.make_help),
            );
            fields.push(
                FieldDescriptor::new("model", strings.model, FieldKind::Text, Validator::None)
                    .with_optional()
                    .with_help(strings.model_help),
            );
            fields.push(
                FieldDescriptor::new(
                    "image",
                    strings.vehicle_image,
                    FieldKind::Text,
                    make_image_validator(max_attachment_bytes),
                )
                .with_optional()
                .with_help(strings.vehicle_image_help),
            );
        }
        fields.push(
            FieldDescriptor::new(
                "year",
                strings.yom,
                FieldKind::Choice(year_choices.options()),
                make_choice_validator(year_choices.clone(), "year"),
            )
            .with_help(strings.yom_help),
        );
        fields.push(
            FieldDescriptor::new(
                "facility_amount",
                strings.facility_amount,
                FieldKind::Decimal,
                make_amount_validator(),
            )
            .with_help(strings.facility_help),
        );
        fields.push(
            FieldDescriptor::new(
                "tenure",
                strings.tenure,
                FieldKind::Choice(tenure_choices.options()),
                make_choice_validator(tenure_choices.clone(), "tenure"),
            )
            .with_help(format!(
                "{}: {} months",
                strings.tenure_help, category.max_tenure_months
            )),
        );
        fields.push(
            FieldDescriptor::new(
                "timeframe",
                strings.timeframe,
                FieldKind::Choice(timeframe_choices.options()),
                make_choice_validator(timeframe_choices.clone(), "timeframe"),
            )
            .with_help(strings.timeframe_help),
        );
        fields.push(
            FieldDescriptor::new("name", strings.name, FieldKind::Text, Validator::None)
                .with_optional(),
        );
        fields.push(
            FieldDescriptor::new("email", strings.email, FieldKind::Text, Validator::None)
                .with_optional(),
        );
        fields.push(
            FieldDescriptor::new("phone", strings.phone, FieldKind::Text, Validator::None)
                .with_optional(),
        );
        fields.push(
            FieldDescriptor::new("town", strings.nearest_town, FieldKind::Text, Validator::None)
                .with_optional()
                .with_help(strings.town_help),
        );

        let mut defaults = BTreeMap::new();
        let mut insert_text = |key: &str, value: &str| {
            if !value.trim().is_empty() {
                defaults.insert(key.to_string(), value.trim().to_string());
            }
        };
        if category.requires_make_model {
            insert_text("make", &initial.make);
            insert_text("model", &initial.model);
        }
        insert_text("name", &initial.name);
        insert_text("email", &initial.email);
        insert_text("phone", &initial.phone);
        insert_text("town", &initial.town);
        let existing_image = initial
            .image
            .clone()
            .filter(|_| category.requires_make_model);
        if let Some(image) = &existing_image {
            defaults.insert("image".into(), image.filename.clone());
        }
        if let Some(display) = year_choices.display_for_value(&initial.year) {
            defaults.insert("year".into(), display);
        }
        defaults.insert(
            "facility_amount".into(),
            format!("{:.0}", initial.facility_amount),
        );
        let tenure = if category.accepts_tenure(initial.tenure_months) {
            initial.tenure_months
        } else {
            category.default_tenure()
        };
        if let Some(display) = tenure_choices.display_for_value(&tenure) {
            defaults.insert("tenure".into(), display);
        }
        if let Some(display) = timeframe_choices.display_for_value(&initial.timeframe) {
            defaults.insert("timeframe".into(), display);
        }

        Self {
            descriptor: FormDescriptor::new("inquiry", fields),
            defaults,
            max_attachment_bytes,
            existing_image,
            year_choices,
            tenure_choices,
            timeframe_choices,
        }
    }

    fn resolve_image(&self, value: &str) -> Result<Option<ImageAttachment>, AttachmentError> {
        if value.is_empty() {
            return Ok(None);
        }
        if let Some(existing) = &self.existing_image {
            if existing.filename == value {
                return Ok(Some(existing.clone()));
            }
        }
        ImageAttachment::from_path(Path::new(value), self.max_attachment_bytes).map(Some)
    }
}

impl FormFlow for InquiryWizard {
    type Output = InquiryForm;
    type Error = WizardError;

    fn descriptor(&self) -> &FormDescriptor {
        &self.descriptor
    }

    fn defaults(&self) -> BTreeMap<String, String> {
        self.defaults.clone()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
        let text = |key: &str| values.get(key).cloned().unwrap_or_default();

        let year = values
            .get("year")
            .and_then(|display| self.year_choices.value_for_display(display))
            .copied()
            .ok_or(WizardError::InvalidField("year"))?;
        let tenure_months = values
            .get("tenure")
            .and_then(|display| self.tenure_choices.value_for_display(display))
            .copied()
            .ok_or(WizardError::InvalidField("tenure"))?;
        let timeframe = values
            .get("timeframe")
            .and_then(|display| self.timeframe_choices.value_for_display(display))
            .copied()
            .ok_or(WizardError::InvalidField("timeframe"))?;
        let facility_amount = values
            .get("facility_amount")
            .and_then(|raw| raw.parse::<f64>().ok())
            .ok_or(WizardError::InvalidField("facility amount"))?;

        let mut form = InquiryForm {
            make: text("make"),
            model: text("model"),
            year,
            facility_amount,
            tenure_months,
            timeframe,
            name: text("name"),
            email: text("email"),
            phone: text("phone"),
            town: text("town"),
            image: None,
        };
        match self.resolve_image(&text("image")) {
            Ok(image) => {
                form.image = image;
                Ok(form)
            }
            Err(source) => Err(WizardError::Attachment {
                source,
                form: Box::new(form),
            }),
        }
    }

    fn cancel(&self) -> Self::Error {
        WizardError::Cancelled
    }
}

/// Collected entries shown on the review step.
#[derive(Default)]
pub struct FormSummary {
    pub entries: Vec<(String, String)>,
}

pub struct PromptContext<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub default: Option<&'a str>,
    pub index: usize,
    pub total: usize,
}

pub trait FormInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse;

    fn confirm(&mut self, summary: &FormSummary, lines: &[String]) -> ConfirmationResponse;
}

/// Terminal implementation backed by the menu renderer and raw-mode prompts.
#[derive(Default)]
pub struct WizardInteraction;

impl WizardInteraction {
    pub fn new() -> Self {
        Self
    }

    fn prompt_text(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        match text_input(context.descriptor.label, context.default) {
            Ok(TextPromptResult::Value(value)) => PromptResponse::Value(value),
            Ok(TextPromptResult::Keep) => PromptResponse::Keep,
            Ok(TextPromptResult::Back) => PromptResponse::Back,
            Ok(TextPromptResult::Help) => PromptResponse::Help,
            Ok(TextPromptResult::Escape) if context.index > 0 => PromptResponse::Back,
            Ok(TextPromptResult::Escape | TextPromptResult::Cancel) | Err(_) => {
                PromptResponse::Cancel
            }
        }
    }

    fn prompt_choice(&mut self, context: &PromptContext<'_>, options: &[String]) -> PromptResponse {
        let mut lines = Vec::new();
        if let Some(help) = &context.descriptor.help {
            lines.push(help.clone());
        }
        if let Some(default) = context.default {
            lines.push(format!("Default: {}", default));
        }
        let title = format!(
            "Step {} of {} – {}",
            context.index + 1,
            context.total,
            context.descriptor.label
        );
        match choice_menu(&title, &lines, options, context.default, context.index > 0) {
            Ok(ChoicePromptResult::Value(value)) => {
                if context.default == Some(value.as_str()) {
                    PromptResponse::Keep
                } else {
                    PromptResponse::Value(value)
                }
            }
            Ok(ChoicePromptResult::Back) => PromptResponse::Back,
            _ => PromptResponse::Cancel,
        }
    }
}

impl FormInteraction for WizardInteraction {
    fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
        match &context.descriptor.kind {
            FieldKind::Choice(options) => self.prompt_choice(context, options),
            _ => self.prompt_text(context),
        }
    }

    fn confirm(&mut self, _summary: &FormSummary, lines: &[String]) -> ConfirmationResponse {
        match confirm_menu("Review your inquiry", lines) {
            Ok(ConfirmationPromptResult::Confirm) => ConfirmationResponse::Confirm,
            Ok(ConfirmationPromptResult::Back) => ConfirmationResponse::Back,
            _ => ConfirmationResponse::Cancel,
        }
    }
}

/// In-progress answers for one run of a [`FormDescriptor`].
pub struct FormSession<'a> {
    descriptor: &'a FormDescriptor,
    values: BTreeMap<String, String>,
    index: usize,
    cancelled: bool,
}

impl<'a> FormSession<'a> {
    pub fn new(descriptor: &'a FormDescriptor, defaults: BTreeMap<String, String>) -> Self {
        Self {
            descriptor,
            values: defaults,
            index: 0,
            cancelled: false,
        }
    }

    pub fn current_field(&self) -> Option<FormStep<'_>> {
        self.descriptor.fields.get(self.index).map(|field| FormStep {
            descriptor: field,
            default: self.values.get(field.key).cloned(),
            index: self.index,
            total: self.descriptor.fields.len(),
        })
    }

    pub fn apply_response(&mut self, response: PromptResponse) -> Result<FormSessionEvent, FieldError> {
        let Some(field) = self.descriptor.fields.get(self.index) else {
            return Ok(FormSessionEvent::NoOp);
        };

        match response {
            PromptResponse::Cancel => {
                self.cancelled = true;
                Ok(FormSessionEvent::Cancelled)
            }
            PromptResponse::Back => {
                if self.index > 0 {
                    self.index -= 1;
                    Ok(FormSessionEvent::Moved)
                } else {
                    io::print_warning("Already at the first field.");
                    Ok(FormSessionEvent::Repeat)
                }
            }
            PromptResponse::Help => {
                match &field.help {
                    Some(help) => io::print_info(help),
                    None => io::print_info("No additional information available for this field."),
                }
                Ok(FormSessionEvent::Repeat)
            }
            PromptResponse::Keep => {
                if self.values.contains_key(field.key) || !field.required {
                    self.index += 1;
                    Ok(FormSessionEvent::Moved)
                } else {
                    io::print_warning("This field is required.");
                    Ok(FormSessionEvent::Repeat)
                }
            }
            PromptResponse::Value(raw) => match field.validator.validate(&raw) {
                Ok(value) if value.is_empty() && field.required => {
                    let err = FieldError::new("This field is required.");
                    io::print_warning(&err);
                    Err(err)
                }
                Ok(value) => {
                    if value.is_empty() {
                        self.values.remove(field.key);
                    } else {
                        self.values.insert(field.key.to_string(), value);
                    }
                    self.index += 1;
                    Ok(FormSessionEvent::Moved)
                }
                Err(err) => {
                    io::print_warning(&err);
                    Err(err)
                }
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.index >= self.descriptor.fields.len()
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSessionEvent {
    Moved,
    Repeat,
    Cancelled,
    NoOp,
}

pub struct FormStep<'a> {
    pub descriptor: &'a FieldDescriptor,
    pub default: Option<String>,
    pub index: usize,
    pub total: usize,
}

/// Field list, defaults and the conversion of answers into a typed value.
pub trait FormFlow {
    type Output;
    type Error;

    fn descriptor(&self) -> &FormDescriptor;

    fn defaults(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error>;

    fn cancel(&self) -> Self::Error;
}

/// Drives a [`FormFlow`] using a [`FormInteraction`] implementation.
pub struct FormEngine<'a, F: FormFlow> {
    flow: &'a F,
}

impl<'a, F: FormFlow> FormEngine<'a, F> {
    pub fn new(flow: &'a F) -> Self {
        Self { flow }
    }

    pub fn run<I: FormInteraction>(
        &self,
        interaction: &mut I,
    ) -> Result<FormResult<F::Output>, F::Error> {
        let descriptor = self.flow.descriptor();
        let mut session = FormSession::new(descriptor, self.flow.defaults());

        loop {
            if session.cancelled {
                return Ok(FormResult::Cancelled);
            }

            if session.is_complete() {
                let summary = build_summary(descriptor, session.values());
                let lines = format_summary_lines(&summary);
                match interaction.confirm(&summary, &lines) {
                    ConfirmationResponse::Confirm => {
                        let output = self.flow.commit(session.values().clone())?;
                        return Ok(FormResult::Completed(output));
                    }
                    ConfirmationResponse::Back if !descriptor.fields.is_empty() => {
                        session.index = descriptor.fields.len() - 1;
                        continue;
                    }
                    ConfirmationResponse::Back | ConfirmationResponse::Cancel => {
                        return Ok(FormResult::Cancelled);
                    }
                }
            }

            let Some(step) = session.current_field() else {
                continue;
            };
            let context = PromptContext {
                descriptor: step.descriptor,
                default: step.default.as_deref(),
                index: step.index,
                total: step.total,
            };
            if !matches!(context.descriptor.kind, FieldKind::Choice(_)) {
                render_prompt(&context);
            }
            let response = interaction.prompt_field(&context);

            match session.apply_response(response) {
                Ok(FormSessionEvent::Cancelled) => return Ok(FormResult::Cancelled),
                // Rejections are printed by the session; re-prompt the same field.
                Ok(_) | Err(_) => continue,
            }
        }
    }
}

fn render_prompt(context: &PromptContext<'_>) {
    let formatter = Formatter::new();
    formatter.print_header(format!(
        "Step {} of {} – {}",
        context.index + 1,
        context.total,
        context.descriptor.label
    ));
    if let Some(default_value) = context.default {
        formatter.print_detail(format!("Default: {}", default_value));
    }
    if let Some(help) = &context.descriptor.help {
        formatter.print_detail(help);
    }
    let mut instructions = vec!["Type a value and press Enter to continue.".to_string()];
    if context.index == 0 {
        instructions.push("Press ESC to leave the form.".into());
    } else {
        instructions.push("Press ESC or type :back to return to the previous field.".into());
    }
    instructions.push("Type :help for details or :clear to remove the current value.".into());
    formatter.print_detail(instructions.join(" "));
}

fn format_summary_lines(summary: &FormSummary) -> Vec<String> {
    let mut lines = vec!["Review your entries:".to_string()];
    for (label, value) in &summary.entries {
        lines.push(format!("  {}: {}", label, value));
    }
    lines
}

fn build_summary(descriptor: &FormDescriptor, values: &BTreeMap<String, String>) -> FormSummary {
    let entries = descriptor
        .fields
        .iter()
        .map(|field| {
            let value = values
                .get(field.key)
                .cloned()
                .unwrap_or_else(|| "-".to_string());
            (field.label.to_string(), value)
        })
        .collect();
    FormSummary { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{get, CategoryId};
    use std::collections::VecDeque;
    use std::io::Write;
    use std::sync::OnceLock;

    struct MockInteraction {
        prompts: VecDeque<PromptResponse>,
        confirmations: VecDeque<ConfirmationResponse>,
        seen: Vec<&'static str>,
    }

    impl MockInteraction {
        fn new(prompts: Vec<PromptResponse>, confirmations: Vec<ConfirmationResponse>) -> Self {
            Self {
                prompts: prompts.into(),
                confirmations: confirmations.into(),
                seen: Vec::new(),
            }
        }
    }

    impl FormInteraction for MockInteraction {
        fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
            self.seen.push(context.descriptor.key);
            self.prompts.pop_front().unwrap_or(PromptResponse::Keep)
        }

        fn confirm(&mut self, _summary: &FormSummary, _lines: &[String]) -> ConfirmationResponse {
            self.confirmations
                .pop_front()
                .unwrap_or(ConfirmationResponse::Confirm)
        }
    }

    struct TestForm;

    impl FormFlow for TestForm {
        type Output = BTreeMap<String, String>;
        type Error = &'static str;

        fn descriptor(&self) -> &FormDescriptor {
            static DESCRIPTOR: OnceLock<FormDescriptor> = OnceLock::new();
            DESCRIPTOR.get_or_init(|| {
                FormDescriptor::new(
                    "test",
                    vec![
                        FieldDescriptor::new("town", "Town", FieldKind::Text, Validator::None),
                        FieldDescriptor::new(
                            "amount",
                            "Amount",
                            FieldKind::Decimal,
                            make_amount_validator(),
                        )
                        .with_help("Leasing amount in LKR."),
                    ],
                )
            })
        }

        fn commit(&self, values: BTreeMap<String, String>) -> Result<Self::Output, Self::Error> {
            Ok(values)
        }

        fn cancel(&self) -> Self::Error {
            "cancelled"
        }
    }

    fn value(raw: &str) -> PromptResponse {
        PromptResponse::Value(raw.to_string())
    }

    #[test]
    fn engine_reprompts_on_invalid_input() {
        let form = TestForm;
        let mut interaction = MockInteraction::new(
            vec![
                value(""),
                value("Kandy"),
                value("1,525,000"),
                value("LKR 1,500,000"),
            ],
            vec![ConfirmationResponse::Confirm],
        );

        let result = FormEngine::new(&form).run(&mut interaction).unwrap();
        let FormResult::Completed(values) = result else {
            panic!("wizard should complete");
        };
        assert_eq!(values.get("town").unwrap(), "Kandy");
        assert_eq!(values.get("amount").unwrap(), "1500000");
        assert_eq!(interaction.seen, vec!["town", "town", "amount", "amount"]);
    }

    #[test]
    fn engine_supports_back_and_help() {
        let form = TestForm;
        let mut interaction = MockInteraction::new(
            vec![
                value("Galle"),
                PromptResponse::Help,
                PromptResponse::Back,
                value("Matara"),
                value("200000"),
            ],
            vec![ConfirmationResponse::Confirm],
        );

        let result = FormEngine::new(&form).run(&mut interaction).unwrap();
        let FormResult::Completed(values) = result else {
            panic!("wizard should complete");
        };
        assert_eq!(values.get("town").unwrap(), "Matara");
    }

    #[test]
    fn engine_cancel_midway() {
        let form = TestForm;
        let mut interaction =
            MockInteraction::new(vec![value("Jaffna"), PromptResponse::Cancel], vec![]);
        let result = FormEngine::new(&form).run(&mut interaction).unwrap();
        assert_eq!(result, FormResult::Cancelled);
    }

    #[test]
    fn review_back_reopens_last_field() {
        let form = TestForm;
        let mut interaction = MockInteraction::new(
            vec![value("Kurunegala"), value("300000"), value("350000")],
            vec![ConfirmationResponse::Back, ConfirmationResponse::Confirm],
        );
        let result = FormEngine::new(&form).run(&mut interaction).unwrap();
        let FormResult::Completed(values) = result else {
            panic!("wizard should complete");
        };
        assert_eq!(values.get("amount").unwrap(), "350000");
    }

    #[test]
    fn inquiry_wizard_collects_a_car_inquiry() {
        let category = get(CategoryId::CarPrivate);
        let initial = InquiryForm::new(category, 2026);
        let wizard = InquiryWizard::new(category, Language::English, 2026, &initial, 1024);
        let mut interaction = MockInteraction::new(
            vec![
                value("Toyota"),
                value("Aqua"),
                value(""),
                value("2023"),
                value("1500000"),
                value("48"),
                value("Within Two Days"),
                value("Nimal Perera"),
                value(""),
                value("0771234567"),
                value("Kandy"),
            ],
            vec![ConfirmationResponse::Confirm],
        );

        let result = FormEngine::new(&wizard).run(&mut interaction).unwrap();
        let FormResult::Completed(form) = result else {
            panic!("wizard should complete");
        };
        assert_eq!(form.make, "Toyota");
        assert_eq!(form.model, "Aqua");
        assert_eq!(form.year, 2023);
        assert_eq!(form.facility_amount, 1_500_000.0);
        assert_eq!(form.tenure_months, 48);
        assert_eq!(form.timeframe, Timeframe::WithinTwoDays);
        assert_eq!(form.email, "");
        assert_eq!(form.town, "Kandy");
        assert!(form.image.is_none());
    }

    #[test]
    fn three_wheeler_wizard_skips_vehicle_identification() {
        let category = get(CategoryId::ThreeWheeler);
        let initial = InquiryForm::new(category, 2026);
        let wizard = InquiryWizard::new(category, Language::English, 2026, &initial, 1024);
        let keys: Vec<_> = wizard.descriptor().fields.iter().map(|f| f.key).collect();
        assert_eq!(
            keys,
            vec!["year", "facility_amount", "tenure", "timeframe", "name", "email", "phone", "town"]
        );

        let mut interaction = MockInteraction::new(Vec::new(), vec![ConfirmationResponse::Confirm]);
        let FormResult::Completed(form) = FormEngine::new(&wizard).run(&mut interaction).unwrap()
        else {
            panic!("defaults should be accepted");
        };
        assert_eq!(form.year, 2026);
        assert_eq!(form.tenure_months, 36);
        assert_eq!(form.facility_amount, 1_000_000.0);
    }

    #[test]
    fn draft_values_are_offered_as_defaults() {
        let category = get(CategoryId::Van);
        let mut draft = InquiryForm::new(category, 2026);
        draft.make = "Nissan".into();
        draft.name = "Kumari".into();
        draft.tenure_months = 60;
        let wizard = InquiryWizard::new(category, Language::Sinhala, 2026, &draft, 1024);
        let defaults = wizard.defaults();
        assert_eq!(defaults.get("make").map(String::as_str), Some("Nissan"));
        assert_eq!(defaults.get("name").map(String::as_str), Some("Kumari"));
        assert_eq!(defaults.get("tenure").map(String::as_str), Some("[9] 60"));
        assert!(!defaults.contains_key("model"));
        assert_eq!(wizard.descriptor().field("make").unwrap().label, "නිෂ්පාදකයා");
    }

    #[test]
    fn image_field_validates_path() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("van.jpg");
        std::fs::File::create(&photo)
            .unwrap()
            .write_all(&[0xFF, 0xD8])
            .unwrap();
        let validator = make_image_validator(1024);
        assert_eq!(
            validator.validate(&format!("\"{}\"", photo.display())).unwrap(),
            photo.display().to_string()
        );
        assert!(validator.validate("/no/such/photo.png").is_err());
        assert!(validator.validate("notes.txt").is_err());
        assert_eq!(validator.validate("  ").unwrap(), "");
    }

    /// Deletes the photo when the review step is reached.
    struct RemovePhotoOnReview {
        inner: MockInteraction,
        photo: std::path::PathBuf,
    }

    impl FormInteraction for RemovePhotoOnReview {
        fn prompt_field(&mut self, context: &PromptContext<'_>) -> PromptResponse {
            self.inner.prompt_field(context)
        }

        fn confirm(&mut self, summary: &FormSummary, lines: &[String]) -> ConfirmationResponse {
            std::fs::remove_file(&self.photo).unwrap();
            self.inner.confirm(summary, lines)
        }
    }

    #[test]
    fn unreadable_photo_returns_the_entered_values() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("aqua.png");
        std::fs::write(&photo, [0x89, b'P', b'N', b'G']).unwrap();

        let category = get(CategoryId::CarPrivate);
        let initial = InquiryForm::new(category, 2026);
        let wizard = InquiryWizard::new(category, Language::English, 2026, &initial, 1024);
        let mut interaction = RemovePhotoOnReview {
            inner: MockInteraction::new(
                vec![
                    value("Toyota"),
                    value("Aqua"),
                    value(&photo.display().to_string()),
                    PromptResponse::Keep,
                    value("1500000"),
                    PromptResponse::Keep,
                    PromptResponse::Keep,
                    value("Nimal Perera"),
                    value("nimal@example.lk"),
                    value("0771234567"),
                    value("Kandy"),
                ],
                vec![ConfirmationResponse::Confirm],
            ),
            photo: photo.clone(),
        };

        let err = FormEngine::new(&wizard).run(&mut interaction).unwrap_err();
        let WizardError::Attachment { source, form } = err else {
            panic!("expected an attachment error");
        };
        assert!(matches!(source, AttachmentError::Read { .. }));
        assert_eq!(form.make, "Toyota");
        assert_eq!(form.name, "Nimal Perera");
        assert_eq!(form.town, "Kandy");
        assert_eq!(form.facility_amount, 1_500_000.0);
        assert!(form.image.is_none());
    }
}
