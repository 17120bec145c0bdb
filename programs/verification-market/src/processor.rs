use solana_program::{clock::Clock, entrypoint::ProgramResult, msg, pubkey::Pubkey};

use crate::{
    instruction::MarketInstruction,
    lifecycle::MarketParams,
    ports::MarketServices,
    state::Market,
};

pub struct Processor;

impl Processor {
    /// Decode `instruction_data` and apply it to `market` on behalf of `caller`
    pub fn process(
        market: &mut Market,
        services: &mut MarketServices,
        caller: &Pubkey,
        clock: &Clock,
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = MarketInstruction::unpack(instruction_data)?;
        let now = clock.unix_timestamp;

        match instruction {
            MarketInstruction::Initialize {
                address,
                content_hash,
                creator,
                creator_pass,
                prediction_end_time,
                verification_start_time,
            } => {
                msg!("Instruction: Initialize");
                market.initialize(
                    services.registry,
                    caller,
                    now,
                    MarketParams {
                        address,
                        content_hash,
                        creator,
                        creator_pass,
                        prediction_end_time,
                        verification_start_time,
                    },
                )
            }

            MarketInstruction::Predict { amount_a, amount_b } => {
                msg!("Instruction: Predict");
                market.predict(services, caller, now, amount_a, amount_b)
            }

            MarketInstruction::Verify {
                attestation_id,
                side,
            } => {
                msg!("Instruction: Verify");
                market
                    .verify(services, caller, now, attestation_id, side)
                    .map(|_| ())
            }

            MarketInstruction::StakeForPrivilege { attestation_id } => {
                msg!("Instruction: StakeForPrivilege");
                market.stake_for_privilege(services, caller, now, attestation_id)
            }

            MarketInstruction::PrivilegeVerify { side } => {
                msg!("Instruction: PrivilegeVerify");
                market.privilege_verify(caller, now, side).map(|_| ())
            }

            MarketInstruction::OpenDispute { content_hash } => {
                msg!("Instruction: OpenDispute");
                market.open_dispute(services, caller, now, content_hash)
            }

            MarketInstruction::ResolveDispute { outcome } => {
                msg!("Instruction: ResolveDispute");
                market.resolve_dispute(services, caller, outcome).map(|_| ())
            }

            MarketInstruction::CloseMarket => {
                msg!("Instruction: CloseMarket");
                market.close_market(services, now).map(|_| ())
            }

            MarketInstruction::WithdrawPredictionReward => {
                msg!("Instruction: WithdrawPredictionReward");
                market.withdraw_prediction_reward(services, caller).map(|_| ())
            }

            MarketInstruction::WithdrawVerificationReward {
                entry_index,
                reclaim_power,
            } => {
                msg!("Instruction: WithdrawVerificationReward");
                market
                    .withdraw_verification_reward(services, caller, entry_index, reclaim_power)
                    .map(|_| ())
            }

            MarketInstruction::WithdrawCreatorFee => {
                msg!("Instruction: WithdrawCreatorFee");
                market.withdraw_creator_fee(services, caller).map(|_| ())
            }

            MarketInstruction::WithdrawRefund => {
                msg!("Instruction: WithdrawRefund");
                market.withdraw_refund(services, caller).map(|_| ())
            }

            MarketInstruction::ReclaimPrivilegeStake => {
                msg!("Instruction: ReclaimPrivilegeStake");
                market.reclaim_privilege_stake(services, caller)
            }
        }
    }
}
