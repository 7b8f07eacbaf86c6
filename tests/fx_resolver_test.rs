mod common;

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal_macros::dec;

use fxwallet_core::errors::Error;
use fxwallet_core::fx::{FxError, FxRepositoryTrait, FxServiceTrait, FxService};
use fxwallet_core::config::WalletConfig;

use common::{setup, setup_with, StubRateProvider};

#[tokio::test]
async fn test_resolver_persists_observations_on_live_fetch() {
    let app = setup().await;

    // Drive a fetch through the engine's own resolver path.
    app.service.create_default_wallets("u1").await.unwrap();
    app.service.fund_wallet("u1", "USD", dec!(100)).await.unwrap();
    app.service
        .convert_currency("u1", "USD", "NGN", dec!(10))
        .await
        .unwrap();

    let observations = app.fx_store.observations_for_base("USD").unwrap();
    assert_eq!(observations.len(), 3);
    assert!(observations
        .iter()
        .any(|o| o.target_currency == "NGN" && o.rate == dec!(1500)));
}

#[tokio::test]
async fn test_resolver_serves_stored_rates_when_the_feed_is_down() {
    let app = setup_with(Arc::new(StubRateProvider::failing()), false).await;

    // Seed the store directly, as a previous successful fetch would have.
    app.fx_store
        .save_observations(
            "USD",
            &HashMap::from([
                ("NGN".to_string(), dec!(1480)),
                ("EUR".to_string(), dec!(0.91)),
            ]),
        )
        .unwrap();

    let fx = FxService::new(
        app.fx_store.clone(),
        app.provider.clone(),
        WalletConfig::default(),
    );

    let rates = fx.rates_for_base("USD").await.unwrap();
    assert_eq!(rates.get("NGN"), Some(&dec!(1480)));
    assert_eq!(rates.get("EUR"), Some(&dec!(0.91)));
}

#[tokio::test]
async fn test_resolver_picks_the_newest_stored_observation() {
    let app = setup_with(Arc::new(StubRateProvider::failing()), false).await;

    app.fx_store
        .save_observations("USD", &HashMap::from([("NGN".to_string(), dec!(1400))]))
        .unwrap();
    app.fx_store
        .save_observations("USD", &HashMap::from([("NGN".to_string(), dec!(1525))]))
        .unwrap();

    let fx = FxService::new(
        app.fx_store.clone(),
        app.provider.clone(),
        WalletConfig::default(),
    );

    let rates = fx.rates_for_base("USD").await.unwrap();
    assert_eq!(rates.get("NGN"), Some(&dec!(1525)));
}

#[tokio::test]
async fn test_resolver_fails_only_when_store_is_empty_too() {
    let app = setup_with(Arc::new(StubRateProvider::failing()), false).await;

    let fx = FxService::new(
        app.fx_store.clone(),
        app.provider.clone(),
        WalletConfig::default(),
    );

    let err = fx.rates_for_base("USD").await.unwrap_err();
    assert!(matches!(err, Error::Fx(FxError::RatesUnavailable(_))));

    // A conversion through the engine surfaces the same failure.
    app.service.create_default_wallets("u1").await.unwrap();
    app.service.fund_wallet("u1", "USD", dec!(50)).await.unwrap();
    let err = app
        .service
        .convert_currency("u1", "USD", "NGN", dec!(10))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Fx(FxError::RatesUnavailable(_))));

    // And nothing moved.
    let usd = app.service.find_wallet_by_currency("u1", "USD").unwrap();
    assert_eq!(usd.balance, dec!(50));
}

#[tokio::test]
async fn test_cache_absorbs_repeat_lookups() {
    let app = setup().await;
    app.service.create_default_wallets("u1").await.unwrap();
    app.service.fund_wallet("u1", "USD", dec!(100)).await.unwrap();

    app.service
        .convert_currency("u1", "USD", "NGN", dec!(10))
        .await
        .unwrap();
    let first = app.provider.call_count();
    assert_eq!(first, 1);

    // Same base again within the TTL: no new fetch.
    app.service
        .convert_currency("u1", "USD", "EUR", dec!(10))
        .await
        .unwrap();
    assert_eq!(app.provider.call_count(), first);
}
