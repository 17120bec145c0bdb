mod common;

use common::*;
use solana_program::pubkey::Pubkey;
use verification_market::{
    error::MarketError,
    ports::InstrumentOwnership,
    state::{ConfigUpdate, Market, MarketPhase, MarketResult, Side},
    MarketParams,
};

#[test]
fn test_initialize_guards() {
    let mut env = TestEnv::new();
    let params = env.params();

    // Only the factory creates markets
    let mut market = Market::default();
    let stranger = Pubkey::new_unique();
    assert_eq!(
        market.initialize(&env.registry, &stranger, NOW, params),
        Err(MarketError::OnlyFactory.into())
    );

    // Prediction must end in the future, verification cannot start before it
    let factory = env.factory;
    let bad = MarketParams {
        prediction_end_time: NOW,
        ..params
    };
    assert_eq!(
        market.initialize(&env.registry, &factory, NOW, bad),
        Err(MarketError::InvalidTimeline.into())
    );
    let bad = MarketParams {
        verification_start_time: PREDICTION_END - 1,
        ..params
    };
    assert_eq!(
        market.initialize(&env.registry, &factory, NOW, bad),
        Err(MarketError::InvalidTimeline.into())
    );

    market
        .initialize(&env.registry, &factory, NOW, params)
        .unwrap();
    assert!(market.is_initialized);
    market.validate().unwrap();

    assert_eq!(
        market.initialize(&env.registry, &factory, NOW, params),
        Err(MarketError::Forbidden.into())
    );
}

#[test]
fn test_config_is_copied_at_creation() {
    let mut env = TestEnv::new();
    let market = env.create_market();

    env.update_config(ConfigUpdate {
        burn_fee_bps: Some(300),
        dispute_period: Some(10),
        ..Default::default()
    });

    assert_eq!(market.config.burn_fee_bps, 100);
    assert_eq!(market.config.dispute_period, 86_400);

    let later = env.create_market();
    assert_eq!(later.config.burn_fee_bps, 300);
    assert_eq!(later.dispute_end_time(), later.verification_end_time() + 10);
}

#[test]
fn test_prediction_window() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();
    let alice = env.funded(tokens(10));

    assert_eq!(
        market.predict(&mut env.services(), &alice, NOW, 0, 0),
        Err(MarketError::ZeroAmount.into())
    );

    // Both sides in one call, accumulated across calls
    market
        .predict(&mut env.services(), &alice, NOW, tokens(2), tokens(3))
        .unwrap();
    market
        .predict(&mut env.services(), &alice, PREDICTION_END - 1, tokens(1), 0)
        .unwrap();
    let entry = market.prediction(&alice).unwrap();
    assert_eq!(entry.amount_a, tokens(3));
    assert_eq!(entry.amount_b, tokens(3));
    assert_eq!(market.total_pool().unwrap(), tokens(6));

    assert_eq!(
        market.predict(&mut env.services(), &alice, PREDICTION_END, tokens(1), 0),
        Err(MarketError::PredictionWindowClosed.into())
    );

    // A short balance leaves the market untouched
    let poor = env.funded(1);
    assert!(market
        .predict(&mut env.services(), &poor, NOW, 2, 0)
        .is_err());
    assert!(market.prediction(&poor).is_none());
    assert_eq!(market.side_a_total, tokens(3));
}

#[test]
fn test_verification_window() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();
    let alice = env.funded(tokens(10));
    market
        .predict(&mut env.services(), &alice, NOW, tokens(5), tokens(5))
        .unwrap();

    let (verifier, id) = env.verifier(tokens(1));
    assert_eq!(
        market.verify(&mut env.services(), &verifier, VERIFICATION_START - 1, id, Side::A),
        Err(MarketError::VerificationNotStarted.into())
    );
    let end = market.verification_end_time();
    assert_eq!(
        market.verify(&mut env.services(), &verifier, end, id, Side::A),
        Err(MarketError::VerificationClosed.into())
    );

    // Someone else's instrument
    let stranger = Pubkey::new_unique();
    assert_eq!(
        market.verify(&mut env.services(), &stranger, VERIFICATION_START, id, Side::A),
        Err(MarketError::IncorrectOwner.into())
    );

    let (empty, empty_id) = env.verifier(0);
    assert_eq!(
        market.verify(&mut env.services(), &empty, VERIFICATION_START, empty_id, Side::A),
        Err(MarketError::InsufficientPower.into())
    );

    market
        .verify(&mut env.services(), &verifier, VERIFICATION_START, id, Side::A)
        .unwrap();
    assert_eq!(env.attestations.owner_of(id).unwrap(), env.escrow);
}

#[test]
fn test_side_cap() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();
    let alice = env.funded(tokens(20));
    market
        .predict(&mut env.services(), &alice, NOW, tokens(10), tokens(10))
        .unwrap();

    let (v1, id1) = env.verifier(tokens(10));
    let (v2, id2) = env.verifier(tokens(10));
    let t = verification_time(&market);
    market.verify(&mut env.services(), &v1, t, id1, Side::A).unwrap();

    assert_eq!(market.verification_capacity(Side::A).unwrap(), 0);
    assert_eq!(market.verification_capacity(Side::B).unwrap(), tokens(10));
    assert_eq!(
        market.verify(&mut env.services(), &v2, t, id2, Side::A),
        Err(MarketError::SideFullyVerified.into())
    );
    // The failed attempt kept custody with the verifier
    assert_eq!(env.attestations.owner_of(id2).unwrap(), v2);

    market.verify(&mut env.services(), &v2, t, id2, Side::B).unwrap();
    assert!(market.is_fully_verified().unwrap());
}

#[test]
fn test_dispute_and_close_windows() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();
    let alice = env.funded(tokens(10));
    market
        .predict(&mut env.services(), &alice, NOW, tokens(10), 0)
        .unwrap();

    let challenger = env.funded(tokens(2_000));
    let hash = market.content_hash;
    let v_end = market.verification_end_time();
    let d_end = market.dispute_end_time();

    assert_eq!(
        market.open_dispute(&mut env.services(), &challenger, v_end - 1, hash),
        Err(MarketError::DisputePeriodIsNotStartedYet.into())
    );
    assert_eq!(
        market.open_dispute(&mut env.services(), &challenger, d_end, hash),
        Err(MarketError::DisputePeriodIsEnded.into())
    );
    assert_eq!(
        market.open_dispute(&mut env.services(), &challenger, v_end, [7u8; 32]),
        Err(MarketError::MarketMismatch.into())
    );
    assert_eq!(
        market.close_market(&mut env.services(), d_end),
        Err(MarketError::DisputePeriodNotEnded.into())
    );

    let arbitrator = env.arbitrator;
    assert_eq!(
        market.resolve_dispute(
            &mut env.services(),
            &arbitrator,
            verification_market::state::DisputeOutcome::Reject
        ),
        Err(MarketError::NoDispute.into())
    );

    market
        .open_dispute(&mut env.services(), &challenger, v_end, hash)
        .unwrap();
    assert_eq!(
        market.open_dispute(&mut env.services(), &challenger, v_end, hash),
        Err(MarketError::DisputeAlreadyOpen.into())
    );
    assert_eq!(market.phase(d_end + 1), MarketPhase::DisputeOpen);
    assert_eq!(
        market.close_market(&mut env.services(), d_end + 1),
        Err(MarketError::DisputeNotSolvedYet.into())
    );
}

#[test]
fn test_phases_follow_the_clock() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();

    assert_eq!(market.phase(NOW), MarketPhase::Predicting);
    assert_eq!(market.phase(PREDICTION_END), MarketPhase::AwaitingVerification);
    assert_eq!(market.phase(VERIFICATION_START), MarketPhase::Verifying);
    assert_eq!(
        market.phase(market.verification_end_time()),
        MarketPhase::DisputeWindow
    );
    assert_eq!(
        market.phase(market.dispute_end_time() - 1),
        MarketPhase::DisputeWindow
    );
    assert_eq!(
        market.phase(market.dispute_end_time()),
        MarketPhase::ReadyToClose
    );
    assert_eq!(
        market.phase(close_time(&market)),
        MarketPhase::ReadyToClose
    );

    market
        .close_market(&mut env.services(), close_time(&market))
        .unwrap();
    assert_eq!(market.phase(NOW), MarketPhase::Closed);
}

#[test]
fn test_closed_market_rejects_writes() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();
    let alice = env.funded(tokens(10));
    market
        .predict(&mut env.services(), &alice, NOW, tokens(10), 0)
        .unwrap();

    let t = close_time(&market);
    market.close_market(&mut env.services(), t).unwrap();
    assert_eq!(
        market.close_market(&mut env.services(), t),
        Err(MarketError::MarketIsClosed.into())
    );
    assert_eq!(
        market.predict(&mut env.services(), &alice, NOW, 1, 0),
        Err(MarketError::MarketIsClosed.into())
    );

    let summary = market.summary();
    assert!(summary.closed);
    assert_eq!(summary.predictor_count, 1);
    assert_eq!(summary.verification_count, 0);
    assert_eq!(summary.result, MarketResult::Draw);
}

#[test]
fn test_withdrawals_wait_for_close() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();
    let alice = env.funded(tokens(10));
    market
        .predict(&mut env.services(), &alice, NOW, tokens(10), 0)
        .unwrap();

    assert_eq!(market.calculate_prediction_reward(&alice).unwrap(), 0);
    assert_eq!(
        market.withdraw_prediction_reward(&mut env.services(), &alice),
        Err(MarketError::MarketIsNotClosedYet.into())
    );
    let creator = env.creator;
    assert_eq!(
        market.withdraw_creator_fee(&mut env.services(), &creator),
        Err(MarketError::MarketIsNotClosedYet.into())
    );
}
