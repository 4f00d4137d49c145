use core_types::layout::MAX_PRODUCTS;
use core_types::{OptionKind, OptionsGroup, Product};

/// Picks the product a bid on (`strike`, `kind`) is placed against.
///
/// Scans the group's product slots in order and returns the first one whose strike
/// slot is set, whose strike equals `strike` and whose kind equals `kind`. Only
/// calls are tradable, so a put or future request never matches. The returned
/// index always fits the venue's one-byte product index.
pub fn select_bid_product(
    group: &OptionsGroup,
    strike: u64,
    kind: OptionKind,
) -> Option<(usize, &Product)> {
    group.products.iter().take(MAX_PRODUCTS).enumerate().find(|(_, product)| {
        product.strike.is_set
            && product.strike.value == strike
            && product.kind == kind
            && product.kind == OptionKind::Call
    })
}
