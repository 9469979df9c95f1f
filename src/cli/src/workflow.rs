//! The payment workflow: collect, check, confirm, submit, and wait for the
//! balance change that proves the payment left the sender.

use crate::config::ReserveConfig;
use crate::errors::{PreconditionError, WalletError};
use crate::input::{self, CollectedPayment, PaymentArgs, Prompter};
use crate::mode::ExecutionMode;
use crate::narrator::Narrator;
use rust_decimal::Decimal;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};
use wallet_core::{
    derive_keypair, BalanceSnapshot, Instructions, PaymentRequest, SignedTransaction, SubmitResult,
};
use wallet_network::{LedgerClient, NetworkError};

/// How the workflow waits for a submitted payment to show up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two rounds of balance fetches
    pub interval: Duration,
    /// Give up after this long; `None` waits until interrupted
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: None,
        }
    }
}

/// A payment that the server accepted for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedPayment {
    /// The signed transaction that was submitted
    pub signed: SignedTransaction,
    /// The server's preliminary result
    pub result: SubmitResult,
}

/// How waiting for confirmation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The source balance dropped below its value before submission.
    Confirmed {
        /// Source balance when the drop was observed
        source: BalanceSnapshot,
        /// Destination balance at the same time
        destination: BalanceSnapshot,
    },
    /// The configured timeout elapsed first.
    TimedOut,
    /// The shutdown signal fired first.
    Interrupted,
}

/// How a whole run of the workflow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// The payment was observed on the ledger.
    Confirmed {
        /// Source balance after the payment
        source_balance: BalanceSnapshot,
        /// Destination balance after the payment
        destination_balance: BalanceSnapshot,
        /// Hash of the submitted transaction
        hash: String,
    },
    /// The user declined to send.
    Cancelled,
    /// The payment was submitted but not observed before the timeout.
    TimedOut {
        /// Hash of the submitted transaction
        hash: String,
    },
    /// The payment was submitted but waiting was interrupted.
    Interrupted {
        /// Hash of the submitted transaction
        hash: String,
    },
}

/// Drives a single payment against a ledger client.
pub struct PaymentWorkflow<'a, C: LedgerClient + ?Sized> {
    client: &'a C,
    reserve: ReserveConfig,
    mode: ExecutionMode,
    narrator: Narrator,
    policy: PollPolicy,
}

impl<'a, C: LedgerClient + ?Sized> PaymentWorkflow<'a, C> {
    /// Creates a workflow with the default poll policy.
    pub fn new(client: &'a C, reserve: ReserveConfig, mode: ExecutionMode) -> Self {
        Self {
            client,
            reserve,
            mode,
            narrator: Narrator::new(mode.is_quiet()),
            policy: PollPolicy::default(),
        }
    }

    /// Replaces the poll policy.
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The narrator used for progress output.
    pub fn narrator(&self) -> &Narrator {
        &self.narrator
    }

    /// Collects the payment parameters for this workflow's mode.
    pub fn collect_request<P: Prompter + ?Sized>(
        &self,
        supplied: &PaymentArgs,
        prompter: &mut P,
    ) -> Result<CollectedPayment, WalletError> {
        input::collect_request(
            self.mode,
            supplied,
            &self.reserve.currency,
            self.reserve.max_fee,
            prompter,
            &self.narrator,
        )
    }

    /// Fetches the balance of an address in the settlement currency.
    ///
    /// With `may_be_unfunded`, an account the ledger does not know holds zero.
    async fn fetch_snapshot(
        &self,
        address: &str,
        may_be_unfunded: bool,
    ) -> Result<BalanceSnapshot, NetworkError> {
        let currency = self.reserve.currency.as_str();
        match self.client.get_balances(address, Some(currency)).await {
            Ok(balances) => Ok(BalanceSnapshot::from_balances(address, currency, &balances)),
            Err(e) if may_be_unfunded && e.is_account_not_found() => {
                debug!("{} is not funded yet, treating it as empty", address);
                Ok(BalanceSnapshot::unfunded(address, currency))
            }
            Err(e) => Err(e),
        }
    }

    /// Checks the addresses of a payment without touching the ledger.
    ///
    /// Returns the source address derived from the secret.
    pub fn check_addresses(&self, request: &PaymentRequest, secret: &str) -> Result<String, WalletError> {
        let derived = derive_keypair(secret)?.address();
        if derived != request.source_address {
            return Err(PreconditionError::SourceMismatch {
                derived,
                requested: request.source_address.clone(),
            }
            .into());
        }
        if derived == request.destination_address {
            return Err(PreconditionError::SameAddress(derived).into());
        }
        Ok(derived)
    }

    /// Checks that the payment leaves both accounts at or above the reserve.
    ///
    /// Returns the source balance before the payment.
    pub async fn check_preconditions(
        &self,
        request: &PaymentRequest,
        secret: &str,
    ) -> Result<BalanceSnapshot, WalletError> {
        let derived = self.check_addresses(request, secret)?;

        let (source, destination) = tokio::join!(
            self.fetch_snapshot(&derived, false),
            self.fetch_snapshot(&request.destination_address, true)
        );
        let source = source?;
        let destination = destination?;

        let reserve = self.reserve.base_reserve;
        let currency = self.reserve.currency.clone();

        self.narrator
            .balance("Current destination balance:", &destination);
        let resulting = destination
            .value
            .checked_add(request.amount)
            .ok_or_else(|| WalletError::invalid("amount", "out of range"))?
            .normalize();
        if resulting < reserve {
            return Err(PreconditionError::DestinationBelowReserve {
                resulting,
                reserve,
                shortfall: (reserve - resulting).normalize(),
                currency,
            }
            .into());
        }

        self.narrator.balance("Current sender balance:", &source);
        let resulting = source
            .value
            .checked_sub(request.amount)
            .ok_or_else(|| WalletError::invalid("amount", "out of range"))?
            .normalize();
        if resulting < reserve {
            return Err(PreconditionError::SourceBelowReserve {
                resulting,
                reserve,
                shortfall: (reserve - resulting).normalize(),
                currency,
            }
            .into());
        }

        Ok(source)
    }

    /// Asks whether to send; unattended modes always agree.
    pub async fn confirm<P: Prompter + ?Sized>(&self, prompter: &mut P) -> Result<bool, WalletError> {
        if self.mode.is_unattended() {
            self.narrator.say("unattended mode on, autoconfirming");
            return Ok(true);
        }
        prompter.confirm("Ready to send?")
    }

    /// Prepares, signs, and submits the payment.
    pub async fn submit(
        &self,
        request: &PaymentRequest,
        secret: &str,
    ) -> Result<SubmittedPayment, WalletError> {
        self.narrator.say("\nPreparing payment transaction...");
        let instructions = Instructions::with_max_fee(request.max_fee);
        let prepared = self
            .client
            .prepare_payment(&request.source_address, request, &instructions)
            .await?;
        debug!(
            "Prepared payment with fee {} valid until ledger {}",
            prepared.fee, prepared.max_ledger_version
        );

        let signed = self.client.sign(&prepared, secret)?;
        self.narrator.signed_transaction(&signed.blob);

        self.narrator.say("Submitting payment...");
        let result = self.client.submit(&signed).await?;
        info!(
            "Payment {} submitted: {} {}",
            signed.hash, result.engine_result, result.engine_result_message
        );

        Ok(SubmittedPayment { signed, result })
    }

    async fn wait_for_drop(
        &self,
        source_address: &str,
        destination_address: &str,
        original: Decimal,
    ) -> Result<(BalanceSnapshot, BalanceSnapshot), WalletError> {
        loop {
            let (source, destination) = tokio::join!(
                self.fetch_snapshot(source_address, false),
                self.fetch_snapshot(destination_address, true)
            );
            let source = source?;
            let destination = destination?;
            if source.value < original {
                return Ok((source, destination));
            }
            debug!("Source balance still {}, waiting", source.value);
            tokio::time::sleep(self.policy.interval).await;
        }
    }

    /// Re-fetches both balances until the source balance drops below `original`.
    ///
    /// Stops early when the poll timeout elapses or `shutdown` completes.
    pub async fn poll_for_confirmation<F>(
        &self,
        source_address: &str,
        destination_address: &str,
        original: Decimal,
        shutdown: F,
    ) -> Result<PollOutcome, WalletError>
    where
        F: Future<Output = ()>,
    {
        let poll = self.wait_for_drop(source_address, destination_address, original);

        let deadline = async {
            match self.policy.timeout {
                Some(timeout) => tokio::time::sleep(timeout).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            polled = poll => {
                let (source, destination) = polled?;
                self.narrator.balance("New source balance:", &source);
                self.narrator.balance("New destination balance:", &destination);
                Ok(PollOutcome::Confirmed { source, destination })
            }
            _ = deadline => {
                warn!("No balance change observed for {}", source_address);
                Ok(PollOutcome::TimedOut)
            }
            _ = shutdown => Ok(PollOutcome::Interrupted),
        }
    }

    /// Runs the whole workflow.
    pub async fn run<P, F>(
        &self,
        supplied: &PaymentArgs,
        prompter: &mut P,
        shutdown: F,
    ) -> Result<PaymentOutcome, WalletError>
    where
        P: Prompter + ?Sized,
        F: Future<Output = ()>,
    {
        let CollectedPayment { request, secret } = self.collect_request(supplied, prompter)?;
        self.narrator
            .say(&format!("Destination address: {}", request.destination_address));
        if let Some(tag) = request.destination_tag {
            self.narrator.say(&format!("Destination tag: {}", tag));
        }
        self.narrator
            .say(&format!("Amount: {} {}", request.amount, request.currency));

        self.check_addresses(&request, &secret)?;
        self.client.connect().await?;
        let source_balance = self.check_preconditions(&request, &secret).await?;

        if !self.confirm(prompter).await? {
            self.narrator.say("exiting...");
            return Ok(PaymentOutcome::Cancelled);
        }

        let submitted = self.submit(&request, &secret).await?;
        let hash = submitted.signed.hash;

        self.narrator
            .say("Waiting for balance to update (use Ctrl-C to abort)");
        let outcome = self
            .poll_for_confirmation(
                &request.source_address,
                &request.destination_address,
                source_balance.value,
                shutdown,
            )
            .await
            .map_err(|error| WalletError::Unconfirmed {
                hash: hash.clone(),
                error: Box::new(error),
            })?;

        Ok(match outcome {
            PollOutcome::Confirmed {
                source,
                destination,
            } => PaymentOutcome::Confirmed {
                source_balance: source,
                destination_balance: destination,
                hash,
            },
            PollOutcome::TimedOut => PaymentOutcome::TimedOut { hash },
            PollOutcome::Interrupted => PaymentOutcome::Interrupted { hash },
        })
    }
}
