//! Constraint-based layout solver: splits a [`Rect`] into sub-rectangles.

use crate::geometry::Rect;

/// Which axis a [`split`] operates along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Children are stacked left to right; constraints size their width.
    Horizontal,
    /// Children are stacked top to bottom; constraints size their height.
    Vertical,
}

/// A declarative sizing rule for one slot of a [`split`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// An exact size in cells.
    Length(u16),
    /// A percentage (0..=100) of the available primary-axis extent.
    Percentage(u16),
    /// A ratio `num/den` of the available primary-axis extent.
    Ratio(u32, u32),
    /// At least this many cells; grows to absorb leftover space like [`Constraint::Fill`].
    Min(u16),
    /// At most this many cells; absorbs leftover space up to the cap.
    Max(u16),
    /// Shares leftover space proportional to `weight` (0 is valid but gets nothing).
    Fill(u16),
}

/// Policy for distributing slack that remains after constraints are
/// satisfied and no [`Constraint::Fill`]/[`Constraint::Min`]/[`Constraint::Max`]
/// absorbed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flex {
    /// Pack all slots at the low-coordinate end; leftover trails.
    Start,
    /// Pack all slots at the high-coordinate end; leftover leads.
    End,
    /// Center the packed slots, splitting leftover evenly at both ends.
    Center,
    /// First/last slot flush with the edges; remaining gaps split the interior leftover.
    SpaceBetween,
    /// Equal gaps between slots; edge gaps are half size.
    SpaceAround,
    /// Equal gaps between slots and at both edges.
    SpaceEvenly,
}

/// Uniform margin subtracted from every edge of the area before solving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Margin {
    /// Cells trimmed from each of the four edges.
    pub amount: u16,
}

impl Margin {
    /// No margin.
    pub const ZERO: Margin = Margin { amount: 0 };

    /// Create a margin of `amount` cells on every edge.
    pub const fn new(amount: u16) -> Self {
        Self { amount }
    }
}

/// Split `area` along `direction` into one [`Rect`] per entry of
/// `constraints`, distributing slack per `flex` and trimming `margin` from
/// every edge first.
pub fn split(
    area: Rect,
    direction: Direction,
    constraints: &[Constraint],
    flex: Flex,
    margin: Margin,
) -> Vec<Rect> {
    if constraints.is_empty() {
        return Vec::new();
    }

    let inner = area.inner_margin(margin.amount);
    let primary_total = match direction {
        Direction::Horizontal => inner.width(),
        Direction::Vertical => inner.height(),
    };

    let (lengths, leftover) = solve(primary_total, constraints);
    let offsets = place(&lengths, leftover, flex);

    lengths
        .iter()
        .zip(offsets.iter())
        .map(|(&len, &offset)| match direction {
            Direction::Horizontal => Rect::new(
                inner.x().saturating_add(offset),
                inner.y(),
                len,
                inner.height(),
            ),
            Direction::Vertical => Rect::new(
                inner.x(),
                inner.y().saturating_add(offset),
                inner.width(),
                len,
            ),
        })
        .collect()
}

/// Compute the final length of every constraint and any slack left over
/// after non-`Fill`/`Min`/`Max` constraints were honoured and the flexible
/// group could not (or did not need to) absorb all of it.
fn solve(total: u16, constraints: &[Constraint]) -> (Vec<u16>, u16) {
    let l = u32::from(total);
    let mut base: Vec<u32> = constraints
        .iter()
        .map(|c| match *c {
            Constraint::Length(n) => u32::from(n),
            Constraint::Percentage(p) => (u32::from(p) * l + 50) / 100,
            Constraint::Ratio(n, d) => {
                if d == 0 {
                    0
                } else {
                    (u64::from(n) * u64::from(l) * 2 + u64::from(d)) as u32 / (2 * d)
                }
            }
            Constraint::Min(n) => u32::from(n),
            Constraint::Max(_) => 0,
            Constraint::Fill(_) => 0,
        })
        .collect();

    distribute_rounding_residue(constraints, &mut base, l);

    let used: u32 = base.iter().sum();
    let leftover = if used <= l { l - used } else { 0 };

    if used > l {
        shrink(constraints, &mut base, used - l);
        let final_lengths = base.iter().map(|&v| v as u16).collect();
        return (final_lengths, 0);
    }

    let remaining = grow(constraints, &mut base, leftover);
    let final_lengths = base.iter().map(|&v| v as u16).collect();
    (final_lengths, remaining as u16)
}

/// Round-robin redistribution so Percentage/Ratio rounding residue sums
/// exactly to the portion of `total` those constraints claim, rather than
/// drifting by a cell from repeated round-half-up.
fn distribute_rounding_residue(constraints: &[Constraint], base: &mut [u32], total: u32) {
    let proportional: Vec<usize> = constraints
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, Constraint::Percentage(_) | Constraint::Ratio(_, _)))
        .map(|(i, _)| i)
        .collect();
    if proportional.is_empty() {
        return;
    }
    let exact_total: u64 = proportional
        .iter()
        .map(|&i| match constraints[i] {
            Constraint::Percentage(p) => u64::from(p) * u64::from(total) / 100,
            Constraint::Ratio(n, d) if d != 0 => u64::from(n) * u64::from(total) / u64::from(d),
            _ => 0,
        })
        .sum();
    let rounded_total: u64 = proportional.iter().map(|&i| u64::from(base[i])).sum();
    if rounded_total > exact_total {
        let mut excess = rounded_total - exact_total;
        for &i in proportional.iter().cycle() {
            if excess == 0 {
                break;
            }
            if base[i] > 0 {
                base[i] -= 1;
                excess -= 1;
            }
        }
    }
}

struct Grow {
    idx: usize,
    weight: u32,
    cap: Option<u32>,
}

/// Distribute `slack` across `Fill`/`Min`/`Max` constraints, weight-proportional
/// with round-robin remainder, respecting `Max` caps and reallocating any
/// capped overflow. Returns slack that could not be placed anywhere.
fn grow(constraints: &[Constraint], base: &mut [u32], slack: u32) -> u32 {
    let mut growable: Vec<Grow> = constraints
        .iter()
        .enumerate()
        .filter_map(|(i, c)| match *c {
            Constraint::Fill(w) => Some(Grow {
                idx: i,
                weight: u32::from(w),
                cap: None,
            }),
            Constraint::Min(_) => Some(Grow {
                idx: i,
                weight: 1,
                cap: None,
            }),
            Constraint::Max(n) => Some(Grow {
                idx: i,
                weight: 1,
                cap: Some(u32::from(n)),
            }),
            _ => None,
        })
        .collect();

    let mut remaining = slack;
    let max_iterations = constraints.len() + 1;
    for _ in 0..max_iterations {
        if growable.is_empty() || remaining == 0 {
            break;
        }
        let total_weight: u32 = growable.iter().map(|g| g.weight).sum();
        if total_weight == 0 {
            break;
        }

        let mut shares = vec![0u32; growable.len()];
        let mut assigned: u32 = 0;
        for (gi, g) in growable.iter().enumerate() {
            let share = (u64::from(remaining) * u64::from(g.weight) / u64::from(total_weight)) as u32;
            shares[gi] = share;
            assigned += share;
        }
        let mut residue = remaining - assigned;
        let mut gi = 0;
        while residue > 0 {
            shares[gi % shares.len()] += 1;
            residue -= 1;
            gi += 1;
        }

        let mut overflow = 0u32;
        let mut next_growable = Vec::with_capacity(growable.len());
        for (gi, g) in growable.iter().enumerate() {
            let proposed = base[g.idx] + shares[gi];
            match g.cap {
                Some(cap) if proposed > cap => {
                    let usable = cap.saturating_sub(base[g.idx]);
                    overflow += shares[gi] - usable;
                    base[g.idx] = cap;
                }
                _ => {
                    base[g.idx] = proposed;
                    next_growable.push(Grow {
                        idx: g.idx,
                        weight: g.weight,
                        cap: g.cap,
                    });
                }
            }
        }
        remaining = overflow;
        growable = next_growable;
    }
    remaining
}

/// Shrink non-`Length` constraints uniformly to absorb a deficit; if that
/// alone is insufficient, shrink `Length` slots from the tail.
fn shrink(constraints: &[Constraint], base: &mut [u32], deficit: u32) {
    let mut remaining = deficit;
    let max_iterations = constraints.len() + 1;
    for _ in 0..max_iterations {
        if remaining == 0 {
            break;
        }
        let eligible: Vec<usize> = constraints
            .iter()
            .enumerate()
            .filter(|(i, c)| !matches!(c, Constraint::Length(_)) && base[*i] > 0)
            .map(|(i, _)| i)
            .collect();
        if eligible.is_empty() {
            break;
        }
        let share = (remaining / eligible.len() as u32).max(1);
        let mut consumed = 0u32;
        for &i in &eligible {
            if consumed >= remaining {
                break;
            }
            let take = share.min(base[i]).min(remaining - consumed);
            base[i] -= take;
            consumed += take;
        }
        if consumed == 0 {
            break;
        }
        remaining -= consumed;
    }
    if remaining > 0 {
        for i in (0..constraints.len()).rev() {
            if remaining == 0 {
                break;
            }
            if matches!(constraints[i], Constraint::Length(_)) {
                let take = base[i].min(remaining);
                base[i] -= take;
                remaining -= take;
            }
        }
    }
}

/// Compute the primary-axis offset of each slot, applying `flex` to any
/// leftover space that the constraint solver did not consume.
fn place(lengths: &[u16], leftover: u16, flex: Flex) -> Vec<u16> {
    let n = lengths.len();
    let mut offsets = vec![0u16; n];
    if n == 0 {
        return offsets;
    }
    if leftover == 0 || n == 1 && !matches!(flex, Flex::Start) {
        let mut cursor = if leftover > 0 && matches!(flex, Flex::End) {
            leftover
        } else if leftover > 0 && matches!(flex, Flex::Center) {
            leftover / 2
        } else {
            0
        };
        for (i, &len) in lengths.iter().enumerate() {
            offsets[i] = cursor;
            cursor = cursor.saturating_add(len);
        }
        return offsets;
    }

    match flex {
        Flex::Start => {
            let mut cursor = 0u16;
            for (i, &len) in lengths.iter().enumerate() {
                offsets[i] = cursor;
                cursor = cursor.saturating_add(len);
            }
        }
        Flex::End => {
            let mut cursor = leftover;
            for (i, &len) in lengths.iter().enumerate() {
                offsets[i] = cursor;
                cursor = cursor.saturating_add(len);
            }
        }
        Flex::Center => {
            let mut cursor = leftover / 2;
            for (i, &len) in lengths.iter().enumerate() {
                offsets[i] = cursor;
                cursor = cursor.saturating_add(len);
            }
        }
        Flex::SpaceBetween => {
            let gaps = (n - 1) as u16;
            let base_gap = leftover / gaps;
            let mut extra = leftover % gaps;
            let mut cursor = 0u16;
            for (i, &len) in lengths.iter().enumerate() {
                offsets[i] = cursor;
                cursor = cursor.saturating_add(len);
                if i < n - 1 {
                    let mut gap = base_gap;
                    if extra > 0 {
                        gap += 1;
                        extra -= 1;
                    }
                    cursor = cursor.saturating_add(gap);
                }
            }
        }
        Flex::SpaceAround => {
            let gap = leftover / n as u16;
            let edge = gap / 2;
            let mut cursor = edge;
            for (i, &len) in lengths.iter().enumerate() {
                offsets[i] = cursor;
                cursor = cursor.saturating_add(len).saturating_add(gap);
            }
        }
        Flex::SpaceEvenly => {
            let gaps = (n + 1) as u16;
            let gap = leftover / gaps;
            let mut extra = leftover % gaps;
            let mut cursor = gap + if extra > 0 {
                extra -= 1;
                1
            } else {
                0
            };
            for (i, &len) in lengths.iter().enumerate() {
                offsets[i] = cursor;
                cursor = cursor.saturating_add(len);
                let mut g = gap;
                if extra > 0 {
                    g += 1;
                    extra -= 1;
                }
                cursor = cursor.saturating_add(g);
            }
        }
    }
    offsets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_split() {
        let area = Rect::new(0, 0, 80, 24);
        let rects = split(
            area,
            Direction::Vertical,
            &[Constraint::Length(3), Constraint::Length(5)],
            Flex::Start,
            Margin::ZERO,
        );
        assert_eq!(rects[0], Rect::new(0, 0, 80, 3));
        assert_eq!(rects[1], Rect::new(0, 3, 80, 5));
    }

    #[test]
    fn percentage_then_fill_s4_scenario() {
        let area = Rect::new(0, 0, 10, 2);
        let rects = split(
            area,
            Direction::Horizontal,
            &[Constraint::Percentage(30), Constraint::Fill(1)],
            Flex::Start,
            Margin::ZERO,
        );
        assert_eq!(rects, vec![Rect::new(0, 0, 3, 2), Rect::new(3, 0, 7, 2)]);
    }

    #[test]
    fn multiple_fills_distribute_equally() {
        let area = Rect::new(0, 0, 80, 24);
        let rects = split(
            area,
            Direction::Vertical,
            &[Constraint::Fill(1), Constraint::Fill(1)],
            Flex::Start,
            Margin::ZERO,
        );
        assert_eq!(rects[0].height(), 12);
        assert_eq!(rects[1].height(), 12);
    }

    #[test]
    fn fill_weights_are_proportional() {
        let area = Rect::new(0, 0, 30, 1);
        let rects = split(
            area,
            Direction::Horizontal,
            &[Constraint::Fill(1), Constraint::Fill(2)],
            Flex::Start,
            Margin::ZERO,
        );
        assert_eq!(rects[0].width(), 10);
        assert_eq!(rects[1].width(), 20);
    }

    #[test]
    fn min_grows_beyond_its_floor() {
        let area = Rect::new(0, 0, 20, 1);
        let rects = split(
            area,
            Direction::Horizontal,
            &[Constraint::Min(2)],
            Flex::Start,
            Margin::ZERO,
        );
        assert_eq!(rects[0].width(), 20);
    }

    #[test]
    fn max_caps_growth() {
        let area = Rect::new(0, 0, 20, 1);
        let rects = split(
            area,
            Direction::Horizontal,
            &[Constraint::Max(5), Constraint::Fill(1)],
            Flex::Start,
            Margin::ZERO,
        );
        assert_eq!(rects[0].width(), 5);
        assert_eq!(rects[1].width(), 15);
    }

    #[test]
    fn shrinks_when_lengths_overflow() {
        let area = Rect::new(0, 0, 10, 1);
        let rects = split(
            area,
            Direction::Horizontal,
            &[Constraint::Length(6), Constraint::Length(6)],
            Flex::Start,
            Margin::ZERO,
        );
        let total: u16 = rects.iter().map(|r| r.width()).sum();
        assert_eq!(total, 10);
    }

    #[test]
    fn empty_constraints_returns_empty() {
        let area = Rect::new(0, 0, 80, 24);
        assert!(split(area, Direction::Vertical, &[], Flex::Start, Margin::ZERO).is_empty());
    }

    #[test]
    fn margin_shrinks_every_edge() {
        let area = Rect::new(0, 0, 10, 10);
        let rects = split(
            area,
            Direction::Horizontal,
            &[Constraint::Fill(1)],
            Flex::Start,
            Margin::new(1),
        );
        assert_eq!(rects[0], Rect::new(1, 1, 8, 8));
    }

    #[test]
    fn offset_area_split() {
        let area = Rect::new(5, 10, 40, 20);
        let rects = split(
            area,
            Direction::Vertical,
            &[Constraint::Length(5), Constraint::Fill(1)],
            Flex::Start,
            Margin::ZERO,
        );
        assert_eq!(rects[0], Rect::new(5, 10, 40, 5));
        assert_eq!(rects[1], Rect::new(5, 15, 40, 15));
    }

    #[test]
    fn flex_center_with_no_fill_splits_leftover() {
        let area = Rect::new(0, 0, 10, 1);
        let rects = split(
            area,
            Direction::Horizontal,
            &[Constraint::Length(4)],
            Flex::Center,
            Margin::ZERO,
        );
        assert_eq!(rects[0], Rect::new(3, 0, 4, 1));
    }

    #[test]
    fn flex_end_with_no_fill_packs_high() {
        let area = Rect::new(0, 0, 10, 1);
        let rects = split(
            area,
            Direction::Horizontal,
            &[Constraint::Length(4)],
            Flex::End,
            Margin::ZERO,
        );
        assert_eq!(rects[0], Rect::new(6, 0, 4, 1));
    }

    #[test]
    fn flex_space_between_flushes_edges() {
        let area = Rect::new(0, 0, 12, 1);
        let rects = split(
            area,
            Direction::Horizontal,
            &[Constraint::Length(2), Constraint::Length(2), Constraint::Length(2)],
            Flex::SpaceBetween,
            Margin::ZERO,
        );
        assert_eq!(rects[0].x(), 0);
        assert_eq!(rects[2].right(), 12);
    }

    #[test]
    fn conservation_property_never_exceeds_area() {
        let area = Rect::new(0, 0, 17, 1);
        for flex in [
            Flex::Start,
            Flex::End,
            Flex::Center,
            Flex::SpaceBetween,
            Flex::SpaceAround,
            Flex::SpaceEvenly,
        ] {
            let rects = split(
                area,
                Direction::Horizontal,
                &[Constraint::Length(3), Constraint::Length(4), Constraint::Length(5)],
                flex,
                Margin::ZERO,
            );
            for r in &rects {
                assert!(r.x() >= area.x());
                assert!(r.right() <= area.right());
            }
        }
    }
}
