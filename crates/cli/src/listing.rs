//! Category listing

use std::io;

use shopfront::catalog::{Catalog, Category, Favourites};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};

use crate::theme::Accent;

/// Print the products of one category, marking the liked ones.
pub(crate) fn write_listing(
    out: &mut impl io::Write,
    catalog: &Catalog<'_>,
    favourites: &Favourites,
    category: Category,
    accent: Accent,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["", "Product", "Sold By", "Rating", "Price", ""]);

    for (idx, product) in catalog.browse(category).enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            product.name.clone(),
            product.sold_by.clone(),
            format!("{}.{}", product.rating / 10, product.rating % 10),
            format!("{}", product.price),
            if favourites.is_liked(product.id.as_str()) {
                "♥".to_string()
            } else {
                String::new()
            },
        ]);
    }

    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), accent.color());
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "\n {}", accent.paint(category.label()))?;
    writeln!(out, "{table}")
}
