//! Event logging for market observations
//!
//! Each event is borsh-serialized and logged base58-encoded after a marker
//! line, so indexers can reconstruct the market history from program logs.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, pubkey::Pubkey};

use crate::state::{DisputeOutcome, MarketResult, Side};

/// Event type discriminator
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    // Lifecycle
    MarketInitialized = 1,
    CloseMarket = 2,

    // Stakes
    Predict = 10,
    Verify = 11,
    PrivilegeStaked = 12,
    PrivilegeVerify = 13,
    PrivilegeReclaimed = 14,

    // Disputes
    DisputeOpened = 20,
    DisputeResolved = 21,

    // Fees
    FeeTransferred = 30,

    // Withdrawals
    PredictionRewardWithdrawn = 40,
    VerificationRewardWithdrawn = 41,
    CreatorFeeWithdrawn = 42,
    RefundWithdrawn = 43,
}

/// Base event trait
pub trait Event: BorshSerialize {
    fn event_type() -> EventType;

    fn emit(&self) {
        msg!("VERIFICATION_MARKET_EVENT");
        msg!("TYPE:{:?}", Self::event_type());

        if let Ok(data) = self.try_to_vec() {
            msg!("DATA:{}", bs58::encode(&data).into_string());
        }
    }
}

/// define_event!(EventName { field: type, ... })
#[macro_export]
macro_rules! define_event {
    ($name:ident { $($field:ident: $type:ty),* $(,)? }) => {
        #[derive(::borsh::BorshSerialize, ::borsh::BorshDeserialize, Debug, Clone, PartialEq)]
        pub struct $name {
            $(pub $field: $type,)*
        }

        impl $crate::events::Event for $name {
            fn event_type() -> $crate::events::EventType {
                $crate::events::EventType::$name
            }
        }
    };
}

/// Destination of a close-time fee transfer
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeKind {
    Burn,
    Foundation,
    DisputeRefund,
    DisputeForfeit,
    ArbitrationShare,
}

define_event!(MarketInitialized {
    market: Pubkey,
    content_hash: [u8; 32],
    creator: Pubkey,
    prediction_end_time: i64,
    verification_start_time: i64,
});

define_event!(CloseMarket {
    market: Pubkey,
    result: MarketResult,
});

define_event!(Predict {
    market: Pubkey,
    account: Pubkey,
    side: Side,
    amount: u128,
});

define_event!(Verify {
    market: Pubkey,
    verifier: Pubkey,
    entry_index: u64,
    attestation_id: u64,
    side: Side,
    power: u128,
});

define_event!(PrivilegeStaked {
    market: Pubkey,
    staker: Pubkey,
    attestation_id: u64,
    power: u128,
});

define_event!(PrivilegeVerify {
    market: Pubkey,
    staker: Pubkey,
    entry_index: u64,
    side: Side,
    power: u128,
});

define_event!(PrivilegeReclaimed {
    market: Pubkey,
    staker: Pubkey,
    attestation_id: u64,
});

define_event!(DisputeOpened {
    market: Pubkey,
    creator: Pubkey,
    price: u128,
});

define_event!(DisputeResolved {
    market: Pubkey,
    outcome: DisputeOutcome,
    confirmed: bool,
    result: MarketResult,
});

define_event!(FeeTransferred {
    market: Pubkey,
    kind: FeeKind,
    recipient: Pubkey,
    amount: u128,
});

define_event!(PredictionRewardWithdrawn {
    market: Pubkey,
    account: Pubkey,
    amount: u128,
});

define_event!(VerificationRewardWithdrawn {
    market: Pubkey,
    verifier: Pubkey,
    entry_index: u64,
    amount: u128,
    reclaim_power: bool,
});

define_event!(CreatorFeeWithdrawn {
    market: Pubkey,
    recipient: Pubkey,
    amount: u128,
});

define_event!(RefundWithdrawn {
    market: Pubkey,
    account: Pubkey,
    amount: u128,
});
