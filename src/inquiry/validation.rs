use crate::catalog::VehicleCategory;
use crate::errors::{InquiryError, ValidationError};

use super::InquiryForm;

/// Checks a form before any send is attempted. The first failing check wins:
/// contact fields, make/model, email shape, then mail credentials.
pub fn validate(
    form: &InquiryForm,
    category: &VehicleCategory,
    credentials_configured: bool,
) -> Result<(), InquiryError> {
    if [&form.name, &form.phone, &form.town]
        .iter()
        .any(|value| is_blank(value))
    {
        return Err(ValidationError::MissingRequiredFields.into());
    }
    if category.requires_make_model && (is_blank(&form.make) || is_blank(&form.model)) {
        return Err(ValidationError::MissingVehicleIdentification.into());
    }
    if let Some(email) = form.customer_email() {
        if !is_plausible_email(email) {
            return Err(ValidationError::InvalidEmailFormat.into());
        }
    }
    if !credentials_configured {
        return Err(InquiryError::NotConfigured);
    }
    Ok(())
}

/// Loose shape check: an `@` and a `.` somewhere in the address.
pub fn is_plausible_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{get, CategoryId};

    fn filled_form(category: CategoryId) -> InquiryForm {
        let mut form = InquiryForm::new(get(category), 2026);
        form.make = "Toyota".into();
        form.model = "Aqua".into();
        form.name = "Nimal Perera".into();
        form.phone = "0771234567".into();
        form.town = "Kandy".into();
        form
    }

    #[test]
    fn complete_form_passes() {
        let form = filled_form(CategoryId::CarPrivate);
        assert!(validate(&form, get(CategoryId::CarPrivate), true).is_ok());
    }

    #[test]
    fn whitespace_only_contact_fields_are_missing() {
        for field in ["name", "phone", "town"] {
            let mut form = filled_form(CategoryId::Van);
            match field {
                "name" => form.name = "   ".into(),
                "phone" => form.phone.clear(),
                _ => form.town = "\t".into(),
            }
            let err = validate(&form, get(CategoryId::Van), true).unwrap_err();
            assert!(
                matches!(
                    err,
                    InquiryError::Validation(ValidationError::MissingRequiredFields)
                ),
                "{field} should be required"
            );
        }
    }

    #[test]
    fn make_and_model_only_required_when_category_asks() {
        let mut form = filled_form(CategoryId::MotorLorry);
        form.model.clear();
        let err = validate(&form, get(CategoryId::MotorLorry), true).unwrap_err();
        assert!(matches!(
            err,
            InquiryError::Validation(ValidationError::MissingVehicleIdentification)
        ));

        let mut tuk = filled_form(CategoryId::ThreeWheeler);
        tuk.make.clear();
        tuk.model.clear();
        assert!(validate(&tuk, get(CategoryId::ThreeWheeler), true).is_ok());
    }

    #[test]
    fn email_is_optional_but_checked_when_present() {
        let category = get(CategoryId::CarPrivate);
        let mut form = filled_form(CategoryId::CarPrivate);
        form.email = "  ".into();
        assert!(validate(&form, category, true).is_ok());

        form.email = "not-an-email".into();
        let err = validate(&form, category, true).unwrap_err();
        assert!(matches!(
            err,
            InquiryError::Validation(ValidationError::InvalidEmailFormat)
        ));

        form.email = "nimal@example.lk".into();
        assert!(validate(&form, category, true).is_ok());
    }

    #[test]
    fn credentials_are_checked_last() {
        let category = get(CategoryId::CarPrivate);
        let mut form = filled_form(CategoryId::CarPrivate);
        assert!(matches!(
            validate(&form, category, false),
            Err(InquiryError::NotConfigured)
        ));

        form.email = "broken".into();
        assert!(matches!(
            validate(&form, category, false),
            Err(InquiryError::Validation(ValidationError::InvalidEmailFormat))
        ));
    }
}
