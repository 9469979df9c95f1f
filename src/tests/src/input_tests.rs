//! Tests for collecting payment parameters.

use rust_decimal_macros::dec;
use std::collections::VecDeque;
use wallet_cli::{
    input::collect_request, ExecutionMode, Narrator, PaymentArgs, Prompter, Question, WalletError,
};

pub const SECRET: &str = "snoPBrXtMeMyMHUVTgbuqAfg1SUTb";
pub const SOURCE: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
pub const DESTINATION: &str = "rrrrrrrrrrrrrrrrrrrrrhoLvTp";

/// A prompter that replays canned answers.
///
/// Answers rejected by a question's validator are recorded and skipped, the
/// way a terminal prompt would ask again.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    confirmations: VecDeque<bool>,
    /// Messages of the questions asked, in order
    pub asked: Vec<String>,
    /// Answers that failed validation
    pub rejected: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn confirming(mut self, answer: bool) -> Self {
        self.confirmations.push_back(answer);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &Question) -> Result<String, WalletError> {
        self.asked.push(question.message.clone());
        while let Some(answer) = self.answers.pop_front() {
            match (question.validator)(&answer) {
                Ok(()) => return Ok(answer),
                Err(_) => self.rejected.push(answer),
            }
        }
        Err(WalletError::UserCancelled)
    }

    fn confirm(&mut self, message: &str) -> Result<bool, WalletError> {
        self.asked.push(message.to_string());
        Ok(self.confirmations.pop_front().unwrap_or(false))
    }
}

fn collect(
    mode: ExecutionMode,
    supplied: &PaymentArgs,
    prompter: &mut ScriptedPrompter,
) -> Result<wallet_cli::CollectedPayment, WalletError> {
    collect_request(mode, supplied, "XRP", dec!(0.0001), prompter, &Narrator::new(true))
}

/// Tests that interactive mode prompts for every missing field in order.
#[test]
fn test_interactive_prompts_for_missing_fields() {
    let mut prompter = ScriptedPrompter::new(&["12.5", DESTINATION, "", SECRET]);
    let collected = collect(ExecutionMode::Interactive, &PaymentArgs::default(), &mut prompter).unwrap();

    assert_eq!(
        prompter.asked,
        vec![
            "Enter XRP amount to send:",
            "Enter destination address:",
            "Enter destination tag (optional):",
            "Enter sender secret:",
        ]
    );
    assert_eq!(collected.request.amount, dec!(12.5));
    assert_eq!(collected.request.destination_tag, None);
    assert_eq!(collected.request.source_address, SOURCE);
}

/// Tests that invalid answers are asked again rather than failing.
#[test]
fn test_invalid_answers_are_reprompted() {
    let mut prompter = ScriptedPrompter::new(&[
        "lots", "7", "rBogus", DESTINATION, "-3", "99", "sBadSecret", SECRET,
    ]);
    let collected = collect(ExecutionMode::Interactive, &PaymentArgs::default(), &mut prompter).unwrap();

    assert_eq!(prompter.rejected, vec!["lots", "rBogus", "-3", "sBadSecret"]);
    assert_eq!(collected.request.amount, dec!(7));
    assert_eq!(collected.request.destination_tag, Some(99));
}

/// Tests that supplied values skip their prompts and win over answers.
#[test]
fn test_supplied_values_skip_prompts() {
    let supplied = PaymentArgs {
        amount: Some("3".to_string()),
        tag: Some("11".to_string()),
        ..Default::default()
    };
    let mut prompter = ScriptedPrompter::new(&[DESTINATION, SECRET]);
    let collected = collect(ExecutionMode::Interactive, &supplied, &mut prompter).unwrap();

    assert_eq!(
        prompter.asked,
        vec!["Enter destination address:", "Enter sender secret:"]
    );
    assert_eq!(collected.request.amount, dec!(3));
    assert_eq!(collected.request.destination_tag, Some(11));
}

/// Tests that unattended mode never prompts and fails on missing values.
#[test]
fn test_unattended_never_prompts() {
    let supplied = PaymentArgs {
        amount: Some("3".to_string()),
        secret: Some(SECRET.to_string()),
        ..Default::default()
    };
    let mut prompter = ScriptedPrompter::new(&[DESTINATION]);
    let result = collect(ExecutionMode::Unattended, &supplied, &mut prompter);

    assert!(matches!(
        result,
        Err(WalletError::InputValidation { field: "destinationAddress", .. })
    ));
    assert!(prompter.asked.is_empty());
}

/// Tests that a supplied invalid value is not silently replaced by a prompt.
#[test]
fn test_invalid_supplied_address_fails() {
    let supplied = PaymentArgs {
        to: Some("rBogus".to_string()),
        ..Default::default()
    };
    let mut prompter = ScriptedPrompter::new(&["1", DESTINATION, "", SECRET]);
    let result = collect(ExecutionMode::Interactive, &supplied, &mut prompter);

    assert!(matches!(
        result,
        Err(WalletError::InputValidation { field: "destinationAddress", .. })
    ));
    assert!(prompter.asked.is_empty());
}

/// Tests that backing out of a prompt cancels without an error status.
#[test]
fn test_backing_out_is_a_cancellation() {
    let mut prompter = ScriptedPrompter::new(&[]);
    let error = collect(ExecutionMode::Interactive, &PaymentArgs::default(), &mut prompter).unwrap_err();
    assert!(matches!(error, WalletError::UserCancelled));
    assert_eq!(error.exit_code(), 0);
}

/// Tests that XRP amounts finer than a drop or above the supply are asked again.
#[test]
fn test_unrepresentable_amounts_are_reprompted() {
    let mut prompter = ScriptedPrompter::new(&[
        "0.0000001",
        "79228162514264337593543950335",
        "0.000001",
        DESTINATION,
        "",
        SECRET,
    ]);
    let collected = collect(ExecutionMode::Interactive, &PaymentArgs::default(), &mut prompter).unwrap();

    assert_eq!(
        prompter.rejected,
        vec!["0.0000001", "79228162514264337593543950335"]
    );
    assert_eq!(collected.request.amount, dec!(0.000001));
}

/// Tests that a supplied XRP amount finer than a drop fails before any prompt.
#[test]
fn test_unattended_sub_drop_amount_fails() {
    let supplied = PaymentArgs {
        amount: Some("0.0000001".to_string()),
        to: Some(DESTINATION.to_string()),
        secret: Some(SECRET.to_string()),
        ..Default::default()
    };
    let mut prompter = ScriptedPrompter::new(&[]);
    let result = collect(ExecutionMode::UnattendedQuiet, &supplied, &mut prompter);

    match result {
        Err(WalletError::InputValidation { field, message }) => {
            assert_eq!(field, "amount");
            assert!(message.contains("6 decimal places"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}
