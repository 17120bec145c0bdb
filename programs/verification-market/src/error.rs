use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, FromPrimitive, PartialEq, Eq)]
pub enum MarketError {
    #[error("Invalid instruction")]
    InvalidInstruction = 0,

    #[error("Market not initialized")]
    NotInitialized = 1,

    #[error("FORBIDDEN")]
    Forbidden = 2,

    #[error("Only the market factory may initialize a market")]
    OnlyFactory = 3,

    #[error("Only the arbitration authority may resolve disputes")]
    OnlyArbitrator = 4,

    #[error("Only the holder of the creator pass may withdraw the creator fee")]
    OnlyCreatorPassHolder = 5,

    #[error("Only the privilege staker may use the reserved power")]
    OnlyPrivilegeStaker = 6,

    #[error("Incorrect owner")]
    IncorrectOwner = 7,

    #[error("Prediction window closed")]
    PredictionWindowClosed = 8,

    #[error("Zero amount")]
    ZeroAmount = 9,

    #[error("Verification not started")]
    VerificationNotStarted = 10,

    #[error("Verification closed")]
    VerificationClosed = 11,

    #[error("Market fully verified")]
    MarketFullyVerified = 12,

    #[error("Side fully verified")]
    SideFullyVerified = 13,

    #[error("Insufficient power")]
    InsufficientPower = 14,

    #[error("Privilege staking is only possible before verification starts")]
    PrivilegeWindowClosed = 15,

    #[error("Privilege slot occupied")]
    PrivilegeSlotOccupied = 16,

    #[error("No privilege stake")]
    NoPrivilegeStake = 17,

    #[error("Privilege already used")]
    PrivilegeAlreadyUsed = 18,

    #[error("Dispute period is not started yet")]
    DisputePeriodIsNotStartedYet = 19,

    #[error("Dispute period is ended")]
    DisputePeriodIsEnded = 20,

    #[error("Dispute period not ended")]
    DisputePeriodNotEnded = 21,

    #[error("Market is closed")]
    MarketIsClosed = 22,

    #[error("Dispute already open")]
    DisputeAlreadyOpen = 23,

    #[error("No dispute")]
    NoDispute = 24,

    #[error("Dispute already solved")]
    DisputeAlreadySolved = 25,

    #[error("Dispute not solved yet")]
    DisputeNotSolvedYet = 26,

    #[error("Market is not closed yet")]
    MarketIsNotClosedYet = 27,

    #[error("Nothing to withdraw")]
    NothingToWithdraw = 28,

    #[error("Already withdrawn")]
    AlreadyWithdrawn = 29,

    #[error("Only for valid markets")]
    OnlyForValidMarkets = 30,

    #[error("Refunds are only paid by invalid markets")]
    MarketIsValid = 31,

    #[error("Content hash does not match this market")]
    MarketMismatch = 32,

    #[error("Invalid verification entry index")]
    InvalidEntryIndex = 33,

    #[error("Invalid fee configuration")]
    InvalidFeeConfig = 34,

    #[error("Invalid market timeline")]
    InvalidTimeline = 35,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 36,

    #[error("Division by zero")]
    DivisionByZero = 37,

    #[error("Escrow balance below required outflow")]
    InsufficientEscrow = 38,
}

/// Coarse grouping used by callers deciding whether to wait, fix or give up.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    Temporal,
    StateConflict,
    InsufficientResource,
    InvariantViolation,
}

impl MarketError {
    pub fn kind(&self) -> ErrorKind {
        use MarketError::*;
        match self {
            Forbidden | OnlyFactory | OnlyArbitrator | OnlyCreatorPassHolder
            | OnlyPrivilegeStaker | IncorrectOwner => ErrorKind::Authorization,

            PredictionWindowClosed | VerificationNotStarted | VerificationClosed
            | PrivilegeWindowClosed | DisputePeriodIsNotStartedYet | DisputePeriodIsEnded
            | DisputePeriodNotEnded => ErrorKind::Temporal,

            NotInitialized | MarketFullyVerified | SideFullyVerified | PrivilegeSlotOccupied
            | NoPrivilegeStake | PrivilegeAlreadyUsed | MarketIsClosed | DisputeAlreadyOpen
            | NoDispute | DisputeAlreadySolved | DisputeNotSolvedYet | MarketIsNotClosedYet
            | NothingToWithdraw | AlreadyWithdrawn | OnlyForValidMarkets | MarketIsValid
            | MarketMismatch | InvalidEntryIndex => ErrorKind::StateConflict,

            InsufficientPower => ErrorKind::InsufficientResource,

            InvalidInstruction | ZeroAmount | InvalidFeeConfig | InvalidTimeline
            | ArithmeticOverflow | DivisionByZero | InsufficientEscrow => {
                ErrorKind::InvariantViolation
            }
        }
    }
}

impl PrintProgramError for MarketError {
    fn print<E>(&self) {
        use solana_program::msg;
        msg!("MarketError: {}", self);
    }
}

impl From<MarketError> for ProgramError {
    fn from(e: MarketError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for MarketError {
    fn type_of() -> &'static str {
        "MarketError"
    }
}
