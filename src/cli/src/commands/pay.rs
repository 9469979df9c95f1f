//! Payment command for the wallet tools.

use crate::config::WalletConfig;
use crate::errors::WalletError;
use crate::input::{PaymentArgs, Prompter};
use crate::mode::ExecutionMode;
use crate::workflow::{PaymentOutcome, PaymentWorkflow, PollPolicy};
use std::future::Future;
use tracing::info;
use wallet_network::LedgerClient;

/// Runs the payment command.
pub async fn run<C, P, F>(
    client: &C,
    config: &WalletConfig,
    mode: ExecutionMode,
    supplied: &PaymentArgs,
    prompter: &mut P,
    shutdown: F,
) -> Result<PaymentOutcome, WalletError>
where
    C: LedgerClient + ?Sized,
    P: Prompter + ?Sized,
    F: Future<Output = ()>,
{
    info!("Starting payment in {} mode", mode);
    let policy = PollPolicy {
        interval: config.poll_interval(),
        timeout: config.poll_timeout(),
    };
    let workflow = PaymentWorkflow::new(client, config.reserve(), mode).with_poll_policy(policy);
    workflow.run(supplied, prompter, shutdown).await
}

/// Completes when the operator presses Ctrl-C.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
