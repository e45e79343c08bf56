//! Wallet rules on top of the wallet store
//!
//! The store only reads and writes balances; every rule about what a valid
//! debit or credit is lives here.

use log::{debug, info};
use nftrader_core::{Price, STARTING_BALANCE};
use nftrader_ports::{PortError, WalletStore};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::error::{Result, TradeError};

/// Play-money wallet operations for one data service
#[derive(Clone)]
pub struct WalletService {
    store: Arc<dyn WalletStore>,
    starting_balance: Price,
}

impl WalletService {
    pub fn new(store: Arc<dyn WalletStore>) -> Self {
        Self {
            store,
            starting_balance: STARTING_BALANCE,
        }
    }

    /// Use a different balance for newly created wallets
    pub fn with_starting_balance(mut self, balance: Price) -> Self {
        self.starting_balance = balance;
        self
    }

    pub fn starting_balance(&self) -> Price {
        self.starting_balance
    }

    /// Return the user's balance, creating the wallet on first use
    pub async fn ensure_wallet(&self, user_id: &str) -> Result<Price> {
        if let Some(balance) = self.store.fetch_balance(user_id).await? {
            return Ok(balance);
        }

        match self.store.insert_wallet(user_id, self.starting_balance).await {
            Ok(balance) => {
                info!("Created wallet for {} with {}", user_id, balance);
                Ok(balance)
            }
            // Another session created it first
            Err(PortError::Conflict(_)) => self.balance(user_id).await,
            Err(e) => Err(e.into()),
        }
    }

    /// Current balance; the wallet must exist
    pub async fn balance(&self, user_id: &str) -> Result<Price> {
        self.store
            .fetch_balance(user_id)
            .await?
            .ok_or_else(|| TradeError::WalletMissing(user_id.to_string()))
    }

    /// Remove `amount` from the wallet; the balance may not go negative
    pub async fn debit(&self, user_id: &str, amount: Price) -> Result<Price> {
        ensure_positive(amount)?;
        let balance = self.balance(user_id).await?;
        let new_balance = balance - amount;
        if new_balance < Decimal::ZERO {
            return Err(TradeError::InsufficientFunds {
                balance,
                required: amount,
            });
        }

        let stored = self.store.update_balance(user_id, new_balance).await?;
        debug!("Debited {} from {}: {} -> {}", amount, user_id, balance, stored);
        Ok(stored)
    }

    /// Add `amount` to the wallet
    pub async fn credit(&self, user_id: &str, amount: Price) -> Result<Price> {
        ensure_positive(amount)?;
        let balance = self.balance(user_id).await?;
        let new_balance = balance
            .checked_add(amount)
            .ok_or(TradeError::InvalidAmount(amount))?;
        let stored = self.store.update_balance(user_id, new_balance).await?;
        debug!("Credited {} to {}: {} -> {}", amount, user_id, balance, stored);
        Ok(stored)
    }
}

fn ensure_positive(amount: Price) -> Result<()> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(TradeError::InvalidAmount(amount))
    }
}
