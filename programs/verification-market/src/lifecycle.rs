//! Market lifecycle: one-shot initialization and close
//!
//! `Predicting -> Verifying -> dispute window -> (dispute open)? -> Closed`.
//! Phases are derived from timestamps on every call; nothing waits.

use solana_program::{
    clock::UnixTimestamp, entrypoint::ProgramResult, msg, program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    constants::BURN_SINK,
    error::MarketError,
    events::{self, Event, FeeKind},
    math::checked_add,
    ports::{MarketServices, ProtocolRegistry, Role},
    settlement::{compute_settlement, DisputeSettlement, PoolSnapshot},
    state::{Market, MarketResult, MARKET_DISCRIMINATOR},
};

/// Factory-supplied market identity and timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketParams {
    pub address: Pubkey,
    pub content_hash: [u8; 32],
    pub creator: Pubkey,
    pub creator_pass: u64,
    pub prediction_end_time: UnixTimestamp,
    pub verification_start_time: UnixTimestamp,
}

impl Market {
    /// Initialize from the registry's current config. Factory only, once.
    pub fn initialize(
        &mut self,
        registry: &dyn ProtocolRegistry,
        caller: &Pubkey,
        now: UnixTimestamp,
        params: MarketParams,
    ) -> ProgramResult {
        if self.is_initialized {
            return Err(MarketError::Forbidden.into());
        }
        if registry.role_of(caller) != Role::Factory {
            return Err(MarketError::OnlyFactory.into());
        }
        if params.prediction_end_time <= now
            || params.verification_start_time < params.prediction_end_time
        {
            msg!(
                "Invalid timeline: now {}, prediction end {}, verification start {}",
                now,
                params.prediction_end_time,
                params.verification_start_time
            );
            return Err(MarketError::InvalidTimeline.into());
        }

        let config = registry.current_config();
        config.validate()?;

        *self = Market {
            discriminator: MARKET_DISCRIMINATOR,
            is_initialized: true,
            address: params.address,
            content_hash: params.content_hash,
            creator: params.creator,
            creator_pass: params.creator_pass,
            config,
            prediction_end_time: params.prediction_end_time,
            verification_start_time: params.verification_start_time,
            ..Market::default()
        };

        events::MarketInitialized {
            market: self.address,
            content_hash: self.content_hash,
            creator: self.creator,
            prediction_end_time: self.prediction_end_time,
            verification_start_time: self.verification_start_time,
        }
        .emit();

        Ok(())
    }

    /// Close an undisputed market after the dispute window
    pub fn close_market(
        &mut self,
        services: &mut MarketServices,
        now: UnixTimestamp,
    ) -> Result<MarketResult, ProgramError> {
        self.require_open()?;

        if let Some(dispute) = &self.dispute {
            if !dispute.solved {
                return Err(MarketError::DisputeNotSolvedYet.into());
            }
        }
        if now <= self.dispute_end_time() {
            return Err(MarketError::DisputePeriodNotEnded.into());
        }

        let result = self.implied_result();
        self.finalize(services, result, DisputeSettlement::Undisputed)?;
        Ok(result)
    }

    /// Freeze `result`, move close-time fees out of escrow and open
    /// withdrawals. Shared by `close_market` and dispute resolution.
    pub(crate) fn finalize(
        &mut self,
        services: &mut MarketServices,
        result: MarketResult,
        dispute: DisputeSettlement,
    ) -> ProgramResult {
        let pools = PoolSnapshot {
            side_a_total: self.side_a_total,
            side_b_total: self.side_b_total,
            verification_count: self.verifications.len(),
        };
        let (settlement, payouts) = compute_settlement(&self.config, &pools, result, dispute)?;

        let foundation_wallet = services.registry.foundation_wallet();
        let arbitrator = services.registry.arbitrator();
        let dispute_creator = self.dispute.map(|d| d.creator);

        let outflow = checked_add(
            checked_add(settlement.burn, settlement.foundation)?,
            payouts.total()?,
        )?;
        let escrow = services.tokens.balance_of(&self.address);
        if escrow < outflow {
            msg!("Escrow {} cannot cover close outflow {}", escrow, outflow);
            return Err(MarketError::InsufficientEscrow.into());
        }

        if settlement.burn > 0 {
            services.tokens.burn(&self.address, settlement.burn)?;
            self.emit_fee(FeeKind::Burn, BURN_SINK, settlement.burn);
        }
        if settlement.foundation > 0 {
            services
                .tokens
                .transfer(&self.address, &foundation_wallet, settlement.foundation)?;
            self.emit_fee(FeeKind::Foundation, foundation_wallet, settlement.foundation);
        }
        if let Some(creator) = dispute_creator {
            if payouts.to_dispute_creator > 0 {
                services
                    .tokens
                    .transfer(&self.address, &creator, payouts.to_dispute_creator)?;
                self.emit_fee(FeeKind::DisputeRefund, creator, payouts.to_dispute_creator);
            }
        }
        if payouts.to_arbitrator > 0 {
            services
                .tokens
                .transfer(&self.address, &arbitrator, payouts.to_arbitrator)?;
            let kind = match dispute {
                DisputeSettlement::Confirmed { .. } => FeeKind::ArbitrationShare,
                _ => FeeKind::DisputeForfeit,
            };
            self.emit_fee(kind, arbitrator, payouts.to_arbitrator);
        }

        self.result = result;
        self.closed = true;
        self.settlement = Some(settlement);

        events::CloseMarket {
            market: self.address,
            result,
        }
        .emit();

        msg!(
            "Market closed with result {}: total {}, prediction pool {}, verifier pool {}",
            result.code(),
            settlement.total,
            settlement.prediction_pool,
            settlement.verifier_pool
        );

        Ok(())
    }

    fn emit_fee(&self, kind: FeeKind, recipient: Pubkey, amount: u128) {
        events::FeeTransferred {
            market: self.address,
            kind,
            recipient,
            amount,
        }
        .emit();
    }
}
