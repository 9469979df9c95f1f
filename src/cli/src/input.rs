//! Collecting the parameters of a payment from arguments and prompts.
//!
//! Values supplied on the command line are validated up front. In interactive
//! mode the remaining fields are prompted for, and the supplied values are then
//! overlaid on the answers so a supplied value always wins.

use crate::errors::WalletError;
use crate::mode::ExecutionMode;
use crate::narrator::Narrator;
use rust_decimal::Decimal;
use std::fmt;
use tracing::debug;
use wallet_core::amount::{max_xrp, parse_amount, xrp_to_drops};
use wallet_core::types::NATIVE_CURRENCY;
use wallet_core::{derive_keypair, is_valid_address, PaymentRequest};

/// Raw payment values as supplied externally or typed in.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PaymentArgs {
    /// Amount to send
    pub amount: Option<String>,
    /// Destination address
    pub to: Option<String>,
    /// Destination tag
    pub tag: Option<String>,
    /// Sender secret
    pub secret: Option<String>,
}

impl fmt::Debug for PaymentArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentArgs")
            .field("amount", &self.amount)
            .field("to", &self.to)
            .field("tag", &self.tag)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl PaymentArgs {
    /// Overlays these values on `prompted`; a value present here wins.
    pub fn overlay(self, prompted: PaymentArgs) -> PaymentArgs {
        PaymentArgs {
            amount: self.amount.or(prompted.amount),
            to: self.to.or(prompted.to),
            tag: self.tag.or(prompted.tag),
            secret: self.secret.or(prompted.secret),
        }
    }

    fn get(&self, field: Field) -> Option<&String> {
        match field {
            Field::Amount => self.amount.as_ref(),
            Field::Destination => self.to.as_ref(),
            Field::Tag => self.tag.as_ref(),
            Field::Secret => self.secret.as_ref(),
        }
    }

    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Amount => &mut self.amount,
            Field::Destination => &mut self.to,
            Field::Tag => &mut self.tag,
            Field::Secret => &mut self.secret,
        };
        *slot = Some(value);
    }
}

/// The fields of a payment, in prompting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    Destination,
    Tag,
    Secret,
}

impl Field {
    /// Every field, in prompting order.
    pub const ALL: [Field; 4] = [Field::Amount, Field::Destination, Field::Tag, Field::Secret];

    /// The field's name in narration and errors.
    pub fn name(self) -> &'static str {
        match self {
            Field::Amount => "amount",
            Field::Destination => "destinationAddress",
            Field::Tag => "destinationTag",
            Field::Secret => "sourceSecret",
        }
    }

    /// The command line flag that supplies the field.
    pub fn flag(self) -> &'static str {
        match self {
            Field::Amount => "--amount",
            Field::Destination => "--to",
            Field::Tag => "--tag",
            Field::Secret => "--secret",
        }
    }

    /// Whether the field may be left empty.
    pub fn is_optional(self) -> bool {
        matches!(self, Field::Tag)
    }

    /// The prompt asking for this field.
    pub fn question(self, currency: &str) -> Question {
        let message = match self {
            Field::Amount => format!("Enter {} amount to send:", currency),
            Field::Destination => "Enter destination address:".to_string(),
            Field::Tag => "Enter destination tag (optional):".to_string(),
            Field::Secret => "Enter sender secret:".to_string(),
        };
        Question {
            message,
            validator: self.validator(currency),
            hidden: matches!(self, Field::Secret),
            optional: self.is_optional(),
        }
    }

    fn validator(self, currency: &str) -> Validator {
        match self {
            Field::Amount if currency == NATIVE_CURRENCY => validate_xrp_amount,
            Field::Amount => validate_amount,
            Field::Destination => validate_address,
            Field::Tag => validate_tag,
            Field::Secret => validate_secret,
        }
    }
}

/// Checks a raw answer, returning the message to show when it is rejected.
pub type Validator = fn(&str) -> Result<(), String>;

/// A single prompt.
#[derive(Debug, Clone)]
pub struct Question {
    /// Text shown to the user
    pub message: String,
    /// Check the answer must pass before it is accepted
    pub validator: Validator,
    /// Whether typed characters are masked
    pub hidden: bool,
    /// Whether an empty answer is acceptable
    pub optional: bool,
}

/// Something that can ask the operator questions.
pub trait Prompter {
    /// Asks a question until the answer passes its validator.
    fn ask(&mut self, question: &Question) -> Result<String, WalletError>;

    /// Asks a yes/no question; anything but an explicit yes is a no.
    fn confirm(&mut self, message: &str) -> Result<bool, WalletError>;
}

/// Accepts a ledger address.
pub fn validate_address(value: &str) -> Result<(), String> {
    if is_valid_address(value.trim()) {
        Ok(())
    } else {
        Err("Please enter a valid address".to_string())
    }
}

/// Accepts a positive decimal amount no larger than the ledger's native supply.
pub fn validate_amount(value: &str) -> Result<(), String> {
    match parse_amount(value) {
        Ok(amount) if amount <= Decimal::ZERO => {
            Err("Please enter an amount greater than zero".to_string())
        }
        Ok(amount) if amount > max_xrp() => {
            Err(format!("Please enter an amount of at most {}", max_xrp()))
        }
        Ok(_) => Ok(()),
        Err(_) => Err("Please enter a number".to_string()),
    }
}

/// Accepts a positive amount of XRP that is a whole number of drops.
pub fn validate_xrp_amount(value: &str) -> Result<(), String> {
    validate_amount(value)?;
    match parse_amount(value).map(xrp_to_drops) {
        Ok(Ok(_)) => Ok(()),
        _ => Err("Please enter an amount with at most 6 decimal places".to_string()),
    }
}

/// Checks the fee cap of a payment.
pub fn check_max_fee(max_fee: Decimal) -> Result<(), WalletError> {
    if max_fee <= Decimal::ZERO {
        return Err(WalletError::invalid("maxFee", "must be greater than zero"));
    }
    xrp_to_drops(max_fee)
        .map(|_| ())
        .map_err(|e| WalletError::invalid("maxFee", e.to_string()))
}

/// Accepts an empty answer or an unsigned 32-bit tag.
pub fn validate_tag(value: &str) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() || value.parse::<u32>().is_ok() {
        Ok(())
    } else {
        Err("Please enter a number".to_string())
    }
}

/// Accepts a secret a keypair can be derived from.
pub fn validate_secret(value: &str) -> Result<(), String> {
    derive_keypair(value.trim())
        .map(|_| ())
        .map_err(|_| "Invalid secret".to_string())
}

/// A collected payment together with the secret that will sign it.
#[derive(Clone, PartialEq, Eq)]
pub struct CollectedPayment {
    /// The payment, with its source derived from the secret
    pub request: PaymentRequest,
    /// The sender's secret
    pub secret: String,
}

impl fmt::Debug for CollectedPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectedPayment")
            .field("request", &self.request)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Gathers a payment request from supplied values and, when interactive, prompts.
pub fn collect_request<P: Prompter + ?Sized>(
    mode: ExecutionMode,
    supplied: &PaymentArgs,
    currency: &str,
    max_fee: Decimal,
    prompter: &mut P,
    narrator: &Narrator,
) -> Result<CollectedPayment, WalletError> {
    check_max_fee(max_fee)?;
    for field in Field::ALL {
        if let Some(value) = supplied.get(field) {
            (field.validator(currency))(value).map_err(|message| WalletError::invalid(field.name(), message))?;
        }
    }

    let mut prompted = PaymentArgs::default();
    for field in Field::ALL {
        if supplied.get(field).is_some() {
            if !mode.is_unattended() {
                narrator.say(&format!("Using \"{}\" option from arguments", field.name()));
            }
            continue;
        }
        if mode.is_unattended() {
            if field.is_optional() {
                continue;
            }
            return Err(WalletError::invalid(
                field.name(),
                format!("missing, supply it with {}", field.flag()),
            ));
        }
        let answer = prompter.ask(&field.question(currency))?;
        prompted.set(field, answer);
    }

    let merged = supplied.clone().overlay(prompted);
    build_request(&merged, currency, max_fee)
}

fn required(args: &PaymentArgs, field: Field) -> Result<String, WalletError> {
    args.get(field)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| WalletError::invalid(field.name(), "a value is required"))
}

fn build_request(
    args: &PaymentArgs,
    currency: &str,
    max_fee: Decimal,
) -> Result<CollectedPayment, WalletError> {
    let amount_text = required(args, Field::Amount)?;
    (Field::Amount.validator(currency))(&amount_text)
        .map_err(|m| WalletError::invalid(Field::Amount.name(), m))?;
    let amount = parse_amount(&amount_text)?;

    let destination = required(args, Field::Destination)?;
    validate_address(&destination)
        .map_err(|m| WalletError::invalid(Field::Destination.name(), m))?;

    let destination_tag = match args.tag.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(tag) => Some(
            tag.parse::<u32>()
                .map_err(|_| WalletError::invalid(Field::Tag.name(), "Please enter a number"))?,
        ),
    };

    let secret = required(args, Field::Secret)?;
    let keypair = derive_keypair(&secret)
        .map_err(|_| WalletError::invalid(Field::Secret.name(), "Invalid secret"))?;
    let source_address = keypair.address();
    debug!("Collected payment of {} {} from {}", amount, currency, source_address);

    Ok(CollectedPayment {
        request: PaymentRequest {
            source_address,
            destination_address: destination,
            destination_tag,
            amount,
            currency: currency.to_string(),
            max_fee,
        },
        secret,
    })
}
