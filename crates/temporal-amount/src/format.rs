//! Exact decomposition of a nanosecond total into `<count><symbol>` parts.

use std::collections::BTreeSet;

use crate::unit::TimeUnit;

/// Render `nanos` using the registered `units`, largest registration last.
///
/// Units are visited in reverse registration order and rounded units are
/// skipped. Each count is the quotient of the remaining nanoseconds,
/// wrapped at the unit's cycle length; a quotient equal to the cycle is
/// kept as `1` so that a whole cycle with no larger unit registered does
/// not render as nothing. Zero renders as an empty string.
pub(crate) fn decompose<'a, I>(nanos: i128, units: I, rounded: &BTreeSet<TimeUnit>) -> String
where
    I: DoubleEndedIterator<Item = (&'a str, TimeUnit)>,
{
    let mut out = String::new();
    if nanos < 0 {
        out.push('-');
    }

    let mut remaining = nanos.unsigned_abs();
    for (symbol, unit) in units.rev() {
        if rounded.contains(&unit) {
            continue;
        }

        let length = unit.nanos();
        let quotient = remaining / length;
        let count = match unit.cycle() {
            Some(cycle) if quotient == cycle => 1,
            Some(cycle) => quotient % cycle,
            None => quotient,
        };
        if count == 0 {
            continue;
        }

        tracing::trace!(symbol, %count, "emit unit");
        out.push_str(&count.to_string());
        out.push_str(symbol);
        remaining -= count * length;
    }

    out
}
