use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::Credentials;
use crate::domain::types::NonEmptyString;
use crate::forms::FormError;

#[derive(Deserialize, Validate)]
/// Login form submitted from the sign-in page.
pub struct LoginForm {
    /// Registered phone number.
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub number: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    /// Validates the form and converts it into backend credentials.
    pub fn into_credentials(self) -> Result<Credentials, FormError> {
        self.validate()?;

        Ok(Credentials {
            number: NonEmptyString::new(self.number).map_err(|_| FormError::Blank("number"))?,
            password: NonEmptyString::new(self.password)
                .map_err(|_| FormError::Blank("password"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts_filled_form() {
        let form = LoginForm {
            number: " 9876543210 ".into(),
            password: "secret".into(),
        };

        let credentials = form.into_credentials().unwrap();

        assert_eq!(credentials.number.as_str(), "9876543210");
        assert_eq!(credentials.password.as_str(), "secret");
    }

    #[test]
    fn rejects_empty_and_blank_fields() {
        let empty = LoginForm {
            number: String::new(),
            password: "secret".into(),
        };
        let blank = LoginForm {
            number: "98".into(),
            password: "   ".into(),
        };

        assert!(matches!(empty.into_credentials(), Err(FormError::Validation(_))));
        assert!(matches!(
            blank.into_credentials(),
            Err(FormError::Blank("password"))
        ));
    }
}
