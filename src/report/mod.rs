use std::io::Write;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::summary::{CategorySummary, SortOrder};

/// Render `value` with exactly `dp` decimal places, rounding half away from
/// zero.
pub fn format_amount(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    // avoid printing "-0.00"
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };

    format!("{:.*}", dp as usize, rounded)
}

/// Print one `category: total` line per category followed by the grand
/// total.
pub fn render(
    summary: &CategorySummary,
    order: SortOrder,
    mut writer: impl Write,
) -> std::io::Result<()> {
    for (category, total) in summary.sorted(order) {
        writeln!(writer, "{category}: {}", format_amount(total, 2))?;
    }

    writeln!(writer, "Total: {}", format_amount(summary.grand_total(), 2))
}
