//! Receipt

use std::io;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartSnapshot, CartSummary},
    pricing::PricingError,
};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The cart could not be priced.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A line total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One printed cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine<'a> {
    /// Product name
    pub name: String,

    /// Seller
    pub sold_by: String,

    /// Price of one unit
    pub unit_price: Money<'a, Currency>,

    /// Number of units
    pub quantity: u32,

    /// Unit price × quantity
    pub line_total: Money<'a, Currency>,
}

/// Printable breakdown of a cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: SmallVec<[ReceiptLine<'a>; 10]>,
    summary: CartSummary<'a>,
    promo_code: Option<String>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a cart's current state.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the cart cannot be priced.
    pub fn from_cart(cart: &Cart<'a>) -> Result<Self, ReceiptError> {
        Self::from_snapshot(&cart.snapshot()?)
    }

    /// Build a receipt from a snapshot taken at checkout.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a line total overflows.
    pub fn from_snapshot(snapshot: &CartSnapshot<'a>) -> Result<Self, ReceiptError> {
        let lines = snapshot
            .items
            .iter()
            .map(|item| {
                Ok(ReceiptLine {
                    name: item.name().to_string(),
                    sold_by: item.sold_by().to_string(),
                    unit_price: *item.unit_price(),
                    quantity: item.quantity(),
                    line_total: item.total()?,
                })
            })
            .collect::<Result<SmallVec<_>, PricingError>>()?;

        Ok(Self {
            lines,
            summary: snapshot.summary,
            promo_code: snapshot.promo_code.clone(),
        })
    }

    /// Printed lines.
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Price breakdown.
    pub fn summary(&self) -> &CartSummary<'a> {
        &self.summary
    }

    /// Prints the receipt.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Sold By", "Unit Price", "Qty", "Total"]);

        for (idx, line) in self.lines.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                line.name.clone(),
                line.sold_by.clone(),
                format!("{}", line.unit_price),
                line.quantity.to_string(),
                format!("{}", line.line_total),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());
        table.modify(Columns::new(2..3), color_dark_grey());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let discount_label = match &self.promo_code {
            Some(code) => format!(" Discount ({code}):"),
            None => " Discount:".to_string(),
        };

        let rows: [(String, String); 5] = [
            (" Subtotal:".to_string(), format!("{}", self.summary.subtotal)),
            (" Tax:".to_string(), format!("{}", self.summary.tax)),
            (" Delivery:".to_string(), format!("{}", self.summary.delivery_fee)),
            (discount_label, format!("-{}", self.summary.discount)),
            (" Total:".to_string(), format!("{}", self.summary.total)),
        ];

        let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.chars().count()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, "{label:<label_width$} {value:>value_width$}  ")
                .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(
            out,
            " {} item{}",
            self.summary.item_count,
            if self.summary.item_count == 1 { "" } else { "s" }
        )
        .map_err(|_err| ReceiptError::IO)?;

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::items::NewLineItem;

    use super::*;

    fn cart<'a>() -> Result<Cart<'a>, CartError> {
        let mut cart = Cart::new(INR);

        cart.add_item(
            NewLineItem::new("earbuds", "Wireless Earbuds", Money::from_minor(240_000, INR))
                .quantity(2)
                .sold_by("SoundHub"),
        )?
        .add_item(
            NewLineItem::new("charger", "Fast Charger", Money::from_minor(340_000, INR))
                .sold_by("VoltWorks"),
        )?;

        Ok(cart)
    }

    #[test]
    fn lines_follow_cart_order() -> TestResult {
        let receipt = Receipt::from_cart(&cart()?)?;

        let names: Vec<&str> = receipt.lines().iter().map(|line| line.name.as_str()).collect();

        assert_eq!(names, vec!["Wireless Earbuds", "Fast Charger"]);
        assert_eq!(
            receipt.lines().first().map(|line| line.line_total),
            Some(Money::from_minor(480_000, INR))
        );
        assert_eq!(receipt.summary().total, Money::from_minor(820_000, INR));

        Ok(())
    }

    #[test]
    fn write_to_prints_lines_and_totals() -> TestResult {
        let receipt = Receipt::from_cart(&cart()?)?;
        let mut out = Vec::new();

        receipt.write_to(&mut out)?;

        let printed = String::from_utf8(out)?;

        assert!(printed.contains("Wireless Earbuds"));
        assert!(printed.contains("VoltWorks"));
        assert!(printed.contains("Total:"));
        assert!(printed.contains("3 items"));

        Ok(())
    }
}
