//! Terminal prompts.

use crate::errors::WalletError;
use crate::input::{Prompter, Question};
use inquire::validator::Validation;
use inquire::{Confirm, CustomUserError, InquireError, Password, PasswordDisplayMode, Text};

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn ask(&mut self, question: &Question) -> Result<String, WalletError> {
        let check = question.validator;
        let validator = move |input: &str| -> Result<Validation, CustomUserError> {
            Ok(match check(input) {
                Ok(()) => Validation::Valid,
                Err(message) => Validation::Invalid(message.into()),
            })
        };

        let answer = if question.hidden {
            Password::new(&question.message)
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .with_validator(validator)
                .prompt()?
        } else {
            Text::new(&question.message)
                .with_validator(validator)
                .prompt()?
        };

        Ok(answer.trim().to_string())
    }

    fn confirm(&mut self, message: &str) -> Result<bool, WalletError> {
        match Confirm::new(message).with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
