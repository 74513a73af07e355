//! One shopping session: browse, fill the cart, print the receipt and optionally pay.

use std::io;

use anyhow::{Context, bail};
use shopfront::{
    cart::CartError,
    catalog::{Category, Favourites},
    checkout::{CheckoutError, checkout},
    fixtures::Fixture,
    receipt::Receipt,
};
use tracing::{debug, info, warn};

use crate::{config::Config, gateway::SimulatedGateway, listing::write_listing, theme::Accent};

/// Run the session described by `config`, writing everything the shopper sees to `out`.
pub(crate) fn run(config: &Config, out: &mut impl io::Write) -> anyhow::Result<()> {
    let set = config.fixtures.set.as_str();
    let mut fixture = Fixture::with_base_path(&config.fixtures.fixtures_dir);

    fixture
        .load_set(set)
        .with_context(|| format!("failed to load fixture set {set}"))?;

    let catalog = fixture.catalog()?;

    info!(set, products = catalog.len(), "fixture set loaded");

    let mut favourites = Favourites::new();

    for id in &config.session.likes {
        if catalog.get(id).is_none() {
            bail!("cannot like unknown product {id}");
        }

        let liked = favourites.toggle(id);

        debug!(product = %id, liked, "toggled favourite");
    }

    let mut cart = fixture.cart()?;

    for request in &config.session.adds {
        let product = catalog
            .get(&request.product)
            .with_context(|| format!("cannot add unknown product {}", request.product))?;

        cart.add_item(product.to_line_item(request.quantity))?;
    }

    for id in &config.session.decreases {
        cart.decrease_quantity(id)?;
    }

    for id in &config.session.removals {
        cart.remove_item(id);
    }

    if let Some(code) = &config.session.promo {
        match cart.apply_promo(code, fixture.promotions()) {
            Ok(_) => {}
            Err(CartError::InvalidPromo { code, reason }) => {
                warn!(%code, %reason, "promo code rejected");
                writeln!(out, "\n Promo code {code} not applied: {reason}")?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    let categories = match config.session.browse {
        Some(category) => vec![Category::from(category)],
        None => Category::ALL.to_vec(),
    };

    for category in categories {
        write_listing(
            &mut *out,
            catalog,
            &favourites,
            category,
            Accent::for_category(category),
        )?;
    }

    Receipt::from_cart(&cart)?.write_to(&mut *out)?;

    if !config.payment.pay {
        return Ok(());
    }

    let gateway = SimulatedGateway::new(config.payment.gateway_outcome);

    match checkout(&mut cart, &gateway, &config.payment.metadata(set)) {
        Ok(outcome) => writeln!(out, " {}", outcome.payment.narrate())?,
        Err(err @ (CheckoutError::EmptyCart | CheckoutError::ZeroTotal)) => {
            writeln!(out, " Nothing to pay: {err}")?;
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}
