//! Fixture set loading and end-to-end flows

use rusty_money::{Money, iso::INR};
use shopfront::prelude::*;
use testresult::TestResult;

struct AlwaysSucceeds;

impl PaymentGateway for AlwaysSucceeds {
    fn initiate(&self, amount: PaymentAmount, _metadata: &PaymentMetadata) -> PaymentOutcome {
        PaymentOutcome::Success {
            payment_id: format!("pay_{}", amount.minor),
        }
    }
}

#[test]
fn default_set_loads_deterministically() -> TestResult {
    let first = Fixture::from_set("default")?;
    let second = Fixture::from_set("default")?;

    let ids = |fixture: &Fixture<'_>| -> Result<Vec<String>, FixtureError> {
        Ok(fixture
            .catalog()?
            .iter()
            .map(|product| product.id.to_string())
            .collect())
    };

    assert_eq!(ids(&first)?, ids(&second)?);
    assert_eq!(first.catalog()?.len(), 8);
    assert_eq!(first.currency()?, INR);
    assert_eq!(first.promotions().len(), 3);

    let grocery: Vec<&str> = first
        .catalog()?
        .browse(Category::Grocery)
        .map(|product| product.id.as_str())
        .collect();

    assert_eq!(grocery, vec!["basmati-5kg", "toor-dal-1kg", "cold-pressed-oil"]);

    Ok(())
}

#[test]
fn default_cart_is_taxed_and_ships_free() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let mut cart = fixture.cart()?;

    let summary = cart.compute_summary()?;

    assert_eq!(summary.subtotal, Money::from_minor(820_000, INR));
    assert_eq!(summary.tax, Money::from_minor(41_000, INR));
    assert_eq!(summary.delivery_fee, Money::from_minor(0, INR));
    assert_eq!(summary.total, Money::from_minor(861_000, INR));

    cart.apply_promo("save10", fixture.promotions())?;

    let summary = cart.compute_summary()?;

    assert_eq!(summary.discount, Money::from_minor(82_000, INR));
    assert_eq!(summary.total, Money::from_minor(779_000, INR));

    Ok(())
}

#[test]
fn minimum_subtotal_promo_follows_the_live_subtotal() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let catalog = fixture.catalog()?;
    let mut cart = Cart::with_policy(fixture.currency()?, fixture.policy()?)?;

    let rice = catalog.get("basmati-5kg").ok_or("missing product")?;

    cart.add_item(rice.to_line_item(1))?;

    let rejected = cart.apply_promo("FLAT200", fixture.promotions()).map(|_| ());

    assert!(matches!(
        rejected,
        Err(CartError::InvalidPromo { reason: PromoRejection::BelowMinimum(99_900), .. })
    ));

    cart.increase_quantity("basmati-5kg")?;
    cart.apply_promo("FLAT200", fixture.promotions())?;

    assert_eq!(cart.compute_summary()?.discount, Money::from_minor(20_000, INR));

    cart.decrease_quantity("basmati-5kg")?;

    let summary = cart.compute_summary()?;

    assert_eq!(summary.discount, Money::from_minor(0, INR));
    assert_eq!(summary.tax, Money::from_minor(3_200, INR));
    assert_eq!(summary.total, Money::from_minor(67_200, INR));

    cart.increase_quantity("basmati-5kg")?;

    assert_eq!(cart.compute_summary()?.discount, Money::from_minor(20_000, INR));

    Ok(())
}

#[test]
fn small_orders_pay_delivery() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let mut cart = Cart::with_policy(fixture.currency()?, fixture.policy()?)?;

    let dal = fixture.catalog()?.get("toor-dal-1kg").ok_or("missing product")?;

    cart.add_item(dal.to_line_item(1))?;

    let summary = cart.compute_summary()?;

    assert_eq!(summary.delivery_fee, Money::from_minor(4_000, INR));
    assert_eq!(summary.tax, Money::from_minor(825, INR));
    assert_eq!(summary.total, Money::from_minor(16_500 + 825 + 4_000, INR));

    Ok(())
}

#[test]
fn checkout_clears_a_seeded_cart() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let mut cart = fixture.cart()?;

    let outcome = checkout(&mut cart, &AlwaysSucceeds, &PaymentMetadata::new("Order"))?;

    assert_eq!(
        outcome.payment,
        PaymentOutcome::Success {
            payment_id: "pay_861000".to_string()
        }
    );
    assert_eq!(outcome.snapshot.summary.item_count, 3);
    assert!(cart.is_empty());

    Ok(())
}

#[test]
fn fully_discounted_cart_is_not_charged() -> TestResult {
    let fixture = Fixture::from_set("untaxed")?;
    let mut cart = fixture.cart()?;

    assert!(cart.is_empty());

    let sachet = fixture.catalog()?.get("sample-sachet").ok_or("missing product")?;

    cart.add_item(sachet.to_line_item(1))?;
    cart.apply_promo("freebie", fixture.promotions())?;

    let result = checkout(&mut cart, &AlwaysSucceeds, &PaymentMetadata::new("Order"));

    assert!(matches!(result, Err(CheckoutError::ZeroTotal)));
    assert_eq!(cart.len(), 1);

    Ok(())
}

#[test]
fn receipt_renders_seeded_cart() -> TestResult {
    let fixture = Fixture::from_set("default")?;
    let receipt = Receipt::from_cart(&fixture.cart()?)?;
    let mut out = Vec::new();

    receipt.write_to(&mut out)?;

    let printed = String::from_utf8(out)?;

    assert!(printed.contains("Wireless Earbuds"));
    assert!(printed.contains("Fitness Smartwatch"));
    assert!(printed.contains("3 items"));

    Ok(())
}

#[test]
fn missing_set_is_an_io_error() {
    let result = Fixture::from_set("does-not-exist");

    assert!(matches!(result, Err(FixtureError::Io(_))));
}
