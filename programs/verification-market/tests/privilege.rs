mod common;

use common::*;
use solana_program::pubkey::Pubkey;
use verification_market::{
    error::MarketError,
    ports::{InstrumentOwnership, Role},
    state::{PrivilegeStatus, Side},
};

#[test]
fn test_privilege_stake_then_verify() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();
    let alice = env.funded(tokens(60));
    market
        .predict(&mut env.services(), &alice, NOW, tokens(30), tokens(30))
        .unwrap();

    // Step 1: reserve 40 power before verification opens
    let (staker, pid) = env.verifier(tokens(40));
    market
        .stake_for_privilege(&mut env.services(), &staker, NOW, pid)
        .unwrap();
    assert_eq!(market.reserved_power, tokens(40));
    assert_eq!(env.attestations.owner_of(pid).unwrap(), env.escrow);

    let (other, oid) = env.verifier(tokens(5));
    assert_eq!(
        market.stake_for_privilege(&mut env.services(), &other, NOW, oid),
        Err(MarketError::PrivilegeSlotOccupied.into())
    );

    // Step 2: ordinary verifiers only get the room left beside the reservation
    let (verifier, vid) = env.verifier(tokens(100));
    let t = verification_time(&market);
    market
        .verify(&mut env.services(), &verifier, t, vid, Side::B)
        .unwrap();
    assert_eq!(market.verified_b, tokens(20));
    assert!(market.is_fully_verified().unwrap());

    // Step 3: the reservation converts, bounded by A's need
    assert_eq!(
        market.privilege_verify(&other, t, Side::A),
        Err(MarketError::OnlyPrivilegeStaker.into())
    );
    let index = market.privilege_verify(&staker, t, Side::A).unwrap();
    assert_eq!(index, 1);
    assert_eq!(market.verified_a, tokens(30));
    assert_eq!(market.reserved_power, 0);
    assert!(market.verifications[1].privileged);
    assert_eq!(
        market.privilege.unwrap().status,
        PrivilegeStatus::Converted
    );
    assert_eq!(
        market.privilege_verify(&staker, t, Side::A),
        Err(MarketError::PrivilegeAlreadyUsed.into())
    );
}

#[test]
fn test_privilege_window_and_minimum_power() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();

    let owner = env.owner;
    env.registry
        .set_minimum_mint_power(&owner, tokens(50))
        .unwrap();

    let (weak, wid) = env.verifier(tokens(40));
    assert_eq!(
        market.stake_for_privilege(&mut env.services(), &weak, NOW, wid),
        Err(MarketError::InsufficientPower.into())
    );

    let (strong, sid) = env.verifier(tokens(50));
    assert_eq!(
        market.stake_for_privilege(&mut env.services(), &strong, VERIFICATION_START, sid),
        Err(MarketError::PrivilegeWindowClosed.into())
    );

    // Someone else's instrument needs the operator role
    let stranger = Pubkey::new_unique();
    assert_eq!(
        market.stake_for_privilege(&mut env.services(), &stranger, NOW, sid),
        Err(MarketError::IncorrectOwner.into())
    );
    env.registry
        .grant_role(&owner, stranger, Role::Operator)
        .unwrap();
    market
        .stake_for_privilege(&mut env.services(), &stranger, NOW, sid)
        .unwrap();
    assert_eq!(market.privilege.unwrap().staker, strong);

    assert_eq!(
        market.privilege_verify(&strong, VERIFICATION_START - 1, Side::A),
        Err(MarketError::VerificationNotStarted.into())
    );
}

#[test]
fn test_unused_privilege_is_reclaimed_after_close() {
    let mut env = TestEnv::new();
    let mut market = env.create_market();
    let alice = env.funded(tokens(10));
    market
        .predict(&mut env.services(), &alice, NOW, tokens(5), tokens(5))
        .unwrap();

    let (staker, pid) = env.verifier(tokens(8));
    market
        .stake_for_privilege(&mut env.services(), &staker, NOW, pid)
        .unwrap();

    assert_eq!(
        market.reclaim_privilege_stake(&mut env.services(), &staker),
        Err(MarketError::MarketIsNotClosedYet.into())
    );

    market
        .close_market(&mut env.services(), close_time(&market))
        .unwrap();

    assert_eq!(
        market.reclaim_privilege_stake(&mut env.services(), &alice),
        Err(MarketError::OnlyPrivilegeStaker.into())
    );
    market
        .reclaim_privilege_stake(&mut env.services(), &staker)
        .unwrap();
    assert_eq!(env.attestations.owner_of(pid).unwrap(), staker);
    assert_eq!(market.reserved_power, 0);
    assert_eq!(
        market.reclaim_privilege_stake(&mut env.services(), &staker),
        Err(MarketError::PrivilegeAlreadyUsed.into())
    );
}
