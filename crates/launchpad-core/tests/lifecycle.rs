//! # Lifecycle Tests
//!
//! Create, buy, sell and enumerate tokens through the registry.

mod common;

use common::test_constants::*;
use common::*;

#[test]
fn test_create_registers_token() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let token = ctx
        .launchpad
        .create_token(&alice, "Test", "TST", "ipfs://meta", None)
        .unwrap();

    assert!(ctx.launchpad.is_token(&token));
    assert_eq!(ctx.launchpad.token_count(), 1);
    assert_eq!(ctx.launchpad.all_tokens(), &[token]);

    let record = ctx.launchpad.token_record(&token).unwrap();
    assert_eq!(record.creator, alice);
    assert_eq!(record.symbol, "TST");
    assert_eq!(record.metadata_uri, "ipfs://meta");
    assert_eq!(record.virtual_eth_reserves, INITIAL_VIRTUAL_ETH_RESERVES);
    assert_eq!(record.virtual_token_reserves, INITIAL_VIRTUAL_TOKEN_RESERVES);
    assert_eq!(record.total_supply, 0);
    assert_eq!(record.created_at, START_TIME);

    let ledger = ctx.launchpad.token(&token).unwrap();
    assert_eq!(ledger.name(), "Test");
    assert_eq!(ledger.decimals(), 18);
    assert_eq!(ledger.minter(), ctx.launchpad.address());

    let events = ctx.launchpad.events();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].event,
        LaunchpadEvent::TokenCreated {
            creator: alice,
            token,
            name: "Test".into(),
            symbol: "TST".into(),
            metadata_uri: "ipfs://meta".into(),
        }
    );
}

#[test]
fn test_unknown_token_is_rejected_everywhere() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let ghost = Address::from_low_u64_be(0xdead);
    let expected = LaunchpadError::TokenNotFound { token: ghost };

    assert_eq!(ctx.launchpad.buy_tokens(&alice, &ghost, SMALL_BUY, None).unwrap_err(), expected);
    assert_eq!(ctx.launchpad.buy_tokens_exact(&alice, &ghost, 1, SMALL_BUY, None).unwrap_err(), expected);
    assert_eq!(ctx.launchpad.sell_tokens(&alice, &ghost, 1, None).unwrap_err(), expected);
    assert_eq!(ctx.launchpad.withdraw_creator_fees(&alice, &ghost).unwrap_err(), expected);
    assert_eq!(ctx.launchpad.token_price(&ghost).unwrap_err(), expected);
    assert!(!ctx.launchpad.is_token(&ghost));
}

#[test]
fn test_buy_then_sell_half() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let bob = ctx.accounts.bob;
    let token = ctx.launch(alice, None);

    let bought = ctx.launchpad.buy_tokens(&bob, &token, SMALL_BUY, None).unwrap();
    let balance = ctx.balance(&token, &bob);
    assert!(balance > 0);
    assert!(balance <= DEFAULT_LAUNCH_WINDOW_CAP);
    assert_eq!(balance, bought.token_amount);
    assert_eq!(bought.eth_spent, SMALL_BUY);
    assert_eq!(bought.fee.total, SMALL_BUY / 100);

    let eth_before = ctx.launchpad.native_balance(&bob);
    let half = balance / 2;
    let sold = ctx.launchpad.sell_tokens(&bob, &token, half, None).unwrap();
    assert_eq!(ctx.balance(&token, &bob), balance - half);
    assert_eq!(ctx.launchpad.native_balance(&bob), eth_before + sold.eth_received);

    // The payout is short of a proportional share of the net input by at least the fee
    let proportional = (SMALL_BUY - bought.fee.total) * half / balance;
    assert!(sold.eth_received < proportional);
    assert_eq!(sold.eth_received, sold.eth_out - sold.fee.total);

    let events = ctx.launchpad.events();
    assert!(matches!(
        events.last().map(|r| &r.event),
        Some(LaunchpadEvent::TokensSold { seller, token_amount, .. }) if *seller == bob && *token_amount == half
    ));
    ctx.assert_supply_consistent(&token);
    ctx.assert_custody_balanced();
}

#[test]
fn test_buying_raises_price_and_selling_lowers_it() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let token = ctx.launch(alice, None);

    let initial = ctx.launchpad.token_price(&token).unwrap();
    assert_eq!(initial, 200_000_000_000_000);
    assert_eq!(ctx.launchpad.market_cap(&token).unwrap(), 0);

    let bought = ctx.launchpad.buy_tokens(&alice, &token, MEDIUM_BUY, None).unwrap();
    let after_buy = ctx.launchpad.token_price(&token).unwrap();
    assert!(after_buy > initial);
    assert_eq!(
        ctx.launchpad.market_cap(&token).unwrap(),
        after_buy * bought.token_amount / PRECISION
    );

    ctx.launchpad.sell_tokens(&alice, &token, bought.token_amount, None).unwrap();
    let after_sell = ctx.launchpad.token_price(&token).unwrap();
    assert!(after_sell < after_buy);
    // Rounding keeps the curve at or above where it started
    assert!(after_sell >= initial);
}

#[test]
fn test_exact_purchase_refunds_excess() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let bob = ctx.accounts.bob;
    let token = ctx.launch(alice, None);

    let wanted = units(15);
    let required = ctx.launchpad.eth_required_for_tokens(&token, wanted).unwrap();
    let overpay = 1_000_000_000_000_000; // 0.001 ETH
    let before = ctx.launchpad.native_balance(&bob);

    let receipt = ctx
        .launchpad
        .buy_tokens_exact(&bob, &token, wanted, required + overpay, None)
        .unwrap();
    assert_eq!(receipt.refund, overpay);
    assert_eq!(receipt.eth_spent, required);
    assert_eq!(ctx.balance(&token, &bob), wanted);
    assert_eq!(ctx.launchpad.native_balance(&bob), before - required);

    match &ctx.launchpad.events().last().unwrap().event {
        LaunchpadEvent::TokensBought { eth_amount, token_amount, .. } => {
            assert_eq!(*eth_amount, required);
            assert_eq!(*token_amount, wanted);
        }
        other => panic!("unexpected event {:?}", other),
    }
    ctx.assert_custody_balanced();
}

#[test]
fn test_exact_quote_includes_fee() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let token = ctx.launch(alice, None);

    let wanted = units(3);
    let record = ctx.launchpad.token_record(&token).unwrap();
    let bare = math::eth_required_for_tokens(
        record.virtual_eth_reserves,
        record.virtual_token_reserves,
        wanted,
    )
    .unwrap();
    let quoted = ctx.launchpad.eth_required_for_tokens(&token, wanted).unwrap();
    assert!(quoted > bare);

    // Sending the quote buys at least the wanted amount on the forward path too
    let quote = ctx.launchpad.quote_buy(&token, quoted).unwrap();
    assert!(quote.token_amount >= wanted);
}

#[test]
fn test_exact_purchase_underpaid_fails() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let token = ctx.launch(alice, None);

    let required = ctx.launchpad.eth_required_for_tokens(&token, units(10)).unwrap();
    let err = ctx
        .launchpad
        .buy_tokens_exact(&alice, &token, units(10), required - 1, None)
        .unwrap_err();
    assert_eq!(err, LaunchpadError::InsufficientEthSent { required, sent: required - 1 });
    assert_eq!(ctx.balance(&token, &alice), 0);
}

#[test]
fn test_selling_more_than_held_fails() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let bob = ctx.accounts.bob;
    let token = ctx.launch(alice, None);
    let bought = ctx.launchpad.buy_tokens(&bob, &token, SMALL_BUY, None).unwrap();

    let err = ctx
        .launchpad
        .sell_tokens(&bob, &token, bought.token_amount + 1, None)
        .unwrap_err();
    assert_eq!(
        err,
        LaunchpadError::InsufficientTokenBalance {
            account: bob,
            available: bought.token_amount,
            required: bought.token_amount + 1,
        }
    );
}

#[test]
fn test_zero_amounts_are_rejected() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let token = ctx.launch(alice, None);

    assert_eq!(ctx.launchpad.buy_tokens(&alice, &token, 0, None).unwrap_err().kind(), "ZeroAmount");
    assert_eq!(ctx.launchpad.buy_tokens_exact(&alice, &token, 0, 1, None).unwrap_err().kind(), "ZeroAmount");
    assert_eq!(ctx.launchpad.sell_tokens(&alice, &token, 0, None).unwrap_err().kind(), "ZeroAmount");

    // A single base unit is worth less than a wei
    ctx.launchpad.buy_tokens(&alice, &token, SMALL_BUY, None).unwrap();
    assert_eq!(ctx.launchpad.sell_tokens(&alice, &token, 1, None).unwrap_err().kind(), "ZeroAmount");
}

#[test]
fn test_buyer_without_funds_is_rejected() {
    let mut ctx = TestContext::builder().funding(0).build();
    let alice = ctx.accounts.alice;
    let token = ctx.launch(alice, None);

    let err = ctx.launchpad.buy_tokens(&alice, &token, SMALL_BUY, None).unwrap_err();
    assert_eq!(
        err,
        LaunchpadError::InsufficientFunds {
            account: alice,
            available: 0,
            required: SMALL_BUY,
        }
    );
    assert_eq!(ctx.launchpad.token_record(&token).unwrap().total_supply, 0);
}

#[test]
fn test_symbol_and_name_bounds_are_enforced() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;

    let err = ctx
        .launchpad
        .create_token(&alice, "Test", "ELEVENCHARS", "", None)
        .unwrap_err();
    assert_eq!(err, LaunchpadError::InvalidSymbol { symbol: "ELEVENCHARS".into(), max_len: 10 });

    let long_name = "x".repeat(51);
    let err = ctx.launchpad.create_token(&alice, &long_name, "TST", "", None).unwrap_err();
    assert_eq!(err.kind(), "InvalidName");

    // Failed creations leave no record and no cooldown behind
    assert_eq!(ctx.launchpad.token_count(), 0);
    let token = ctx
        .launchpad
        .create_token(&alice, &"x".repeat(50), "TENCHARSXX", "", None)
        .unwrap();
    assert!(ctx.launchpad.is_token(&token));
}

#[test]
fn test_unbounded_names_when_configured() {
    let config = LaunchpadConfig { max_name_len: None, ..LaunchpadConfig::default() };
    let mut ctx = TestContext::builder().config(config).build();
    let alice = ctx.accounts.alice;
    assert!(ctx
        .launchpad
        .create_token(&alice, &"x".repeat(200), "TST", "", None)
        .is_ok());
}

#[test]
fn test_holders_can_transfer_tokens() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let bob = ctx.accounts.bob;
    let charlie = ctx.accounts.charlie;
    let token = ctx.launch(alice, None);
    let bought = ctx.launchpad.buy_tokens(&alice, &token, MEDIUM_BUY, None).unwrap();

    ctx.launchpad.transfer_tokens(&alice, &token, &bob, units(10)).unwrap();
    ctx.launchpad.approve_tokens(&bob, &token, &charlie, units(4)).unwrap();
    ctx.launchpad
        .transfer_tokens_from(&charlie, &token, &bob, &charlie, units(4))
        .unwrap();

    assert_eq!(ctx.balance(&token, &alice), bought.token_amount - units(10));
    assert_eq!(ctx.balance(&token, &bob), units(6));
    assert_eq!(ctx.balance(&token, &charlie), units(4));
    assert_eq!(ctx.launchpad.token(&token).unwrap().allowance(&bob, &charlie), 0);

    let err = ctx
        .launchpad
        .transfer_tokens_from(&charlie, &token, &bob, &charlie, 1)
        .unwrap_err();
    assert_eq!(err.kind(), "InsufficientAllowance");

    // Transferred tokens can be sold by their new holder
    ctx.launchpad.sell_tokens(&bob, &token, units(6), None).unwrap();
    ctx.assert_supply_consistent(&token);
}

#[test]
fn test_events_are_sequenced() {
    let mut ctx = TestContext::new();
    let alice = ctx.accounts.alice;
    let token = ctx.launch(alice, None);
    ctx.launchpad.buy_tokens(&alice, &token, SMALL_BUY, None).unwrap();
    let _ = ctx.launchpad.buy_tokens(&alice, &token, 0, None);
    ctx.launchpad.sell_tokens(&alice, &token, units(1) / 10, None).unwrap();

    let names: Vec<&str> = ctx.launchpad.events().iter().map(|r| r.event.name()).collect();
    assert_eq!(names, vec!["TokenCreated", "TokensBought", "TokensSold"]);
    let sequences: Vec<u64> = ctx.launchpad.events().iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2]);
    assert_eq!(ctx.launchpad.events_since(1).len(), 2);
}
