//! Dispute resolver
//!
//! One dispute per market, opened inside `[verification end, dispute end)`
//! against the dispute price. The arbitrator's ruling closes the market in
//! the same call.

use solana_program::{
    clock::UnixTimestamp, entrypoint::ProgramResult, msg, program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    error::MarketError,
    events::{self, Event},
    ports::{MarketServices, Role},
    settlement::DisputeSettlement,
    state::{DisputeOutcome, DisputeState, Market, MarketResult},
};

impl Market {
    pub fn open_dispute(
        &mut self,
        services: &mut MarketServices,
        caller: &Pubkey,
        now: UnixTimestamp,
        content_hash: [u8; 32],
    ) -> ProgramResult {
        self.require_open()?;

        if content_hash != self.content_hash {
            return Err(MarketError::MarketMismatch.into());
        }
        if now < self.verification_end_time() {
            return Err(MarketError::DisputePeriodIsNotStartedYet.into());
        }
        if now >= self.dispute_end_time() {
            return Err(MarketError::DisputePeriodIsEnded.into());
        }
        if self.dispute.is_some() {
            return Err(MarketError::DisputeAlreadyOpen.into());
        }

        let price = self.config.dispute_price;
        services.tokens.transfer(caller, &self.address, price)?;

        self.dispute = Some(DisputeState {
            creator: *caller,
            price,
            opened_at: now,
            confirmed: false,
            solved: false,
        });

        events::DisputeOpened {
            market: self.address,
            creator: *caller,
            price,
        }
        .emit();

        Ok(())
    }

    /// Rule on the open dispute and close the market
    pub fn resolve_dispute(
        &mut self,
        services: &mut MarketServices,
        caller: &Pubkey,
        outcome: DisputeOutcome,
    ) -> Result<MarketResult, ProgramError> {
        let is_arbitrator = services.registry.role_of(caller) == Role::Arbitrator
            || *caller == services.registry.arbitrator();
        if !is_arbitrator {
            return Err(MarketError::OnlyArbitrator.into());
        }

        self.require_open()?;
        let dispute = self.dispute.ok_or(MarketError::NoDispute)?;
        if dispute.solved {
            return Err(MarketError::DisputeAlreadySolved.into());
        }

        let implied = self.implied_result();
        let result = match outcome {
            DisputeOutcome::ConfirmA => MarketResult::WinnerA,
            DisputeOutcome::ConfirmB => MarketResult::WinnerB,
            DisputeOutcome::Draw => MarketResult::Draw,
            DisputeOutcome::Reject => implied,
        };
        let confirmed = result != implied;

        let settlement = if confirmed {
            DisputeSettlement::Confirmed {
                price: dispute.price,
            }
        } else {
            DisputeSettlement::Rejected {
                price: dispute.price,
            }
        };
        self.finalize(services, result, settlement)?;

        self.dispute = Some(DisputeState {
            confirmed,
            solved: true,
            ..dispute
        });

        events::DisputeResolved {
            market: self.address,
            outcome,
            confirmed,
            result,
        }
        .emit();

        msg!(
            "Dispute resolved: implied {}, final {}, confirmed {}",
            implied.code(),
            result.code(),
            confirmed
        );

        Ok(result)
    }
}
