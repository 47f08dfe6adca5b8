//! Display strings for the two supported languages.
//!
//! Every piece of user-facing text is looked up through [`Language`] instead of
//! branching on the language at each call site. Email content sent to the
//! leasing officer is always English and does not go through this table.

use serde::{Deserialize, Serialize};

use crate::errors::{InquiryError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Sinhala,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Sinhala];

    pub fn strings(self) -> &'static Strings {
        match self {
            Language::English => &ENGLISH,
            Language::Sinhala => &SINHALA,
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Sinhala => "සිංහල",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Sinhala,
            Language::Sinhala => Language::English,
        }
    }
}

/// A label carried in both languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized {
    pub english: &'static str,
    pub sinhala: &'static str,
}

impl Localized {
    pub const fn new(english: &'static str, sinhala: &'static str) -> Self {
        Self { english, sinhala }
    }

    pub fn get(&self, language: Language) -> &'static str {
        match language {
            Language::English => self.english,
            Language::Sinhala => self.sinhala,
        }
    }
}

pub struct Strings {
    pub welcome_title: &'static str,
    pub welcome_subtitle: &'static str,
    pub find_plan: &'static str,
    pub select_category: &'static str,
    pub select_registration: &'static str,
    pub select_type: &'static str,
    pub back: &'static str,
    pub make: &'static str,
    pub make_help: &'static str,
    pub model: &'static str,
    pub model_help: &'static str,
    pub vehicle_image: &'static str,
    pub vehicle_image_help: &'static str,
    pub yom: &'static str,
    pub yom_help: &'static str,
    pub facility_amount: &'static str,
    pub facility_help: &'static str,
    pub tenure: &'static str,
    pub tenure_help: &'static str,
    pub timeframe: &'static str,
    pub timeframe_help: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub nearest_town: &'static str,
    pub town_help: &'static str,
    pub fill_required: &'static str,
    pub fill_make_model: &'static str,
    pub valid_email: &'static str,
    pub configure_email: &'static str,
    pub sending: &'static str,
    pub inquiry_sent: &'static str,
    pub inquiry_failed: &'static str,
    pub thank_you: &'static str,
    pub inquiry_submitted: &'static str,
    pub inquiry_summary: &'static str,
    pub vehicle_details: &'static str,
    pub contact_details: &'static str,
    pub category: &'static str,
    pub image_attached: &'static str,
    pub view_email: &'static str,
    pub sent_to: &'static str,
    pub submit_another: &'static str,
    pub back_home: &'static str,
    pub language: &'static str,
    pub exit: &'static str,
}

impl Strings {
    /// Localized message for a failed submission attempt.
    pub fn error_message(&self, error: &InquiryError) -> String {
        match error {
            InquiryError::Validation(ValidationError::MissingRequiredFields) => {
                self.fill_required.to_string()
            }
            InquiryError::Validation(ValidationError::MissingVehicleIdentification) => {
                self.fill_make_model.to_string()
            }
            InquiryError::Validation(ValidationError::InvalidEmailFormat) => {
                self.valid_email.to_string()
            }
            InquiryError::NotConfigured => self.configure_email.to_string(),
            InquiryError::Transport(_) => format!("{}: {}", self.inquiry_failed, error),
            InquiryError::Navigation(err) => err.to_string(),
        }
    }
}

static ENGLISH: Strings = Strings {
    welcome_title: "Welcome to Your Vehicle Leasing Assistant",
    welcome_subtitle: "Your trusted partner for vehicle financing solutions",
    find_plan: "Find Your Perfect Vehicle Leasing Plan",
    select_category: "Select Your Vehicle Category",
    select_registration: "Select Registration Status",
    select_type: "Select Vehicle Type",
    back: "Back",
    make: "Make",
    make_help: "Enter the vehicle manufacturer (e.g., Toyota, Honda, Nissan)",
    model: "Model",
    model_help: "Enter the vehicle model (e.g., Aqua, Vezel, March)",
    vehicle_image: "Vehicle Image",
    vehicle_image_help: "Path to a clear JPG or PNG photo of the vehicle (optional)",
    yom: "Year of Manufacture (YOM)",
    yom_help: "Select the year your vehicle was manufactured",
    facility_amount: "Expected Facility Amount (LKR)",
    facility_help: "Enter the leasing amount you need",
    tenure: "Tenure (Months)",
    tenure_help: "Maximum tenure",
    timeframe: "Timeframe for Leasing",
    timeframe_help: "When do you plan to get the vehicle?",
    name: "Full Name",
    email: "Email Address",
    phone: "Phone Number",
    nearest_town: "Nearest Town",
    town_help: "Enter your nearest town or city",
    fill_required: "Please fill in all required fields (Name, Phone, Nearest Town)",
    fill_make_model: "Please fill in vehicle make and model",
    valid_email: "Please enter a valid email address (or leave it empty)",
    configure_email: "Please configure email settings first",
    sending: "Sending inquiry email...",
    inquiry_sent: "Inquiry Sent Successfully!",
    inquiry_failed: "Failed to send inquiry",
    thank_you: "Thank You for Your Inquiry!",
    inquiry_submitted: "Your leasing inquiry has been submitted successfully. Our team will review your request and get back to you soon.",
    inquiry_summary: "Inquiry Summary",
    vehicle_details: "Vehicle Details",
    contact_details: "Contact Details",
    category: "Category",
    image_attached: "Attached to email",
    view_email: "View Email Details",
    sent_to: "This inquiry was sent to",
    submit_another: "Submit Another Inquiry",
    back_home: "Back to Home",
    language: "Language / භාෂාව",
    exit: "Exit",
};

static SINHALA: Strings = Strings {
    welcome_title: "ඔබගේ වාහන ලීසිං සහායකයා වෙත සාදරයෙන් පිළිගනිමු",
    welcome_subtitle: "වාහන මූල්‍ය විසඳුම් සඳහා ඔබගේ විශ්වාසනීය සහකරු",
    find_plan: "ඔබගේ පරිපූර්ණ වාහන ලීසිං සැලැස්ම සොයන්න",
    select_category: "ඔබගේ වාහන වර්ගය තෝරන්න",
    select_registration: "ලියාපදිංචි තත්ත්වය තෝරන්න",
    select_type: "වාහන වර්ගය තෝරන්න",
    back: "ආපසු",
    make: "නිෂ්පාදකයා",
    make_help: "වාහන නිෂ්පාදකයා ඇතුළත් කරන්න (උදා: Toyota, Honda, Nissan)",
    model: "මාදිලිය",
    model_help: "වාහන මාදිලිය ඇතුළත් කරන්න (උදා: Aqua, Vezel, March)",
    vehicle_image: "වාහන රූපය",
    vehicle_image_help: "වාහනයේ පැහැදිලි JPG හෝ PNG ඡායාරූපයක ගොනු මාර්ගය (විකල්ප)",
    yom: "නිෂ්පාදන වර්ෂය (YOM)",
    yom_help: "ඔබේ වාහනය නිෂ්පාදනය කළ වර්ෂය තෝරන්න",
    facility_amount: "අපේක්ෂිත පහසුකම් මුදල (රු.)",
    facility_help: "ඔබට අවශ්‍ය ලීසිං මුදල ඇතුළත් කරන්න",
    tenure: "කාලසීමාව (මාස)",
    tenure_help: "උපරිම කාලසීමාව",
    timeframe: "ලීසිං සඳහා කාල රාමුව",
    timeframe_help: "ඔබ වාහනය ලබා ගැනීමට සැලසුම් කරන්නේ කවදාද?",
    name: "සම්පූර්ණ නම",
    email: "විද්‍යුත් තැපැල් ලිපිනය",
    phone: "දුරකථන අංකය",
    nearest_town: "ආසන්නතම නගරය",
    town_help: "ඔබගේ ආසන්නතම නගරය ඇතුළත් කරන්න",
    fill_required: "කරුණාකර සියලුම අවශ්‍ය ක්ෂේත්‍ර පුරවන්න (නම, දුරකථනය, ආසන්නතම නගරය)",
    fill_make_model: "කරුණාකර වාහන නිෂ්පාදකයා සහ මාදිලිය පුරවන්න",
    valid_email: "කරුණාකර වලංගු විද්‍යුත් තැපැල් ලිපිනයක් ඇතුළත් කරන්න (හෝ එය හිස්ව තබන්න)",
    configure_email: "කරුණාකර පළමුව විද්‍යුත් තැපැල් සැකසුම් වින්‍යාස කරන්න",
    sending: "විමසීම යවමින්...",
    inquiry_sent: "විමසීම සාර්ථකව යවන ලදී!",
    inquiry_failed: "විමසීම යැවීමට අසමත් විය",
    thank_you: "ඔබගේ විමසීමට ස්තූතියි!",
    inquiry_submitted: "ඔබගේ ලීසිං විමසීම සාර්ථකව ඉදිරිපත් කර ඇත. අපගේ කණ්ඩායම ඔබගේ ඉල්ලීම සමාලෝචනය කර ඉක්මනින් ඔබ වෙත පැමිණෙනු ඇත.",
    inquiry_summary: "විමසීම් සාරාංශය",
    vehicle_details: "වාහන විස්තර",
    contact_details: "සම්බන්ධතා විස්තර",
    category: "වර්ගය",
    image_attached: "විද්‍යුත් තැපෑලට අමුණා ඇත",
    view_email: "විද්‍යුත් තැපැල් විස්තර බලන්න",
    sent_to: "මෙම විමසීම යවන ලද්දේ",
    submit_another: "තවත් විමසීමක් ඉදිරිපත් කරන්න",
    back_home: "මුල් පිටුවට ආපසු",
    language: "Language / භාෂාව",
    exit: "පිටවන්න",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_localized_messages() {
        let err = InquiryError::from(ValidationError::MissingRequiredFields);
        assert!(Language::English
            .strings()
            .error_message(&err)
            .contains("Name, Phone, Nearest Town"));
        assert_eq!(
            Language::Sinhala.strings().error_message(&err),
            SINHALA.fill_required
        );
    }

    #[test]
    fn toggling_switches_language() {
        assert_eq!(Language::English.toggled(), Language::Sinhala);
        assert_eq!(Language::Sinhala.toggled(), Language::English);
    }
}
