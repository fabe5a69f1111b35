//! Word-budget selection.
//!
//! Units are consumed in the order given. A unit is taken while taking it
//! does not move the running total further from the budget than leaving it
//! out; the first unit that would makes the selection stop. There is no
//! lookahead: later units are never considered once one is refused.

use super::unit::Weighted;

/// Select a prefix of `units` whose total weight approximates `budget`.
///
/// Ties (equal error with and without the unit) include the unit. The result
/// may be empty, e.g. for `budget == 0` or empty input; callers decide on a
/// fallback.
pub fn select_with_budget<T, I>(units: I, budget: usize) -> Vec<T>
where
    T: Weighted,
    I: IntoIterator<Item = T>,
{
    let mut total = 0usize;
    let mut selected = Vec::new();

    for unit in units {
        let weight = unit.weight();
        if budget.abs_diff(total + weight) > budget.abs_diff(total) {
            break;
        }
        total += weight;
        selected.push(unit);
    }

    selected
}

/// Distance between the total weight of `units` and `budget`.
pub fn budget_error<T: Weighted>(units: &[T], budget: usize) -> usize {
    let total: usize = units.iter().map(Weighted::weight).sum();
    budget.abs_diff(total)
}
