use std::cmp::Ordering;
use std::f32::consts::TAU;

use crate::config::PackConfig;
use crate::ir::BubbleItem;

use super::types::{PlacedBubble, SizedBubble, circles_intersect};

pub const DEFAULT_CANVAS_SIZE: f32 = 280.0;

/// Packs `items` on concentric rings inside a `canvas_size` square using the
/// default packer constants.
pub fn pack(items: &[BubbleItem], canvas_size: f32) -> Vec<PlacedBubble> {
    let config = PackConfig {
        canvas_size,
        ..PackConfig::default()
    };
    pack_with_config(items, &config)
}

/// Greedy single-pass ring placement.
///
/// The largest bubble sits in the middle of the canvas. The rest go on rings
/// of growing radius; each ring's capacity is derived from the average size
/// of the bubbles still waiting, so rings are never planned ahead. A slot
/// that collides is nudged around the ring a few times and, when every
/// attempt collides, accepted anyway. Such bubbles come back with
/// `overlapped` set, so non-overlap is best-effort rather than guaranteed.
///
/// Output is in placement order: descending diameter, ties in input order.
pub fn pack_with_config(items: &[BubbleItem], config: &PackConfig) -> Vec<PlacedBubble> {
    let mut sized: Vec<SizedBubble> = items.iter().map(SizedBubble::from_item).collect();
    // `sort_by` is stable, equal diameters keep their input order.
    sized.sort_by(|a, b| {
        b.diameter
            .partial_cmp(&a.diameter)
            .unwrap_or(Ordering::Equal)
    });

    let mut queue = sized.into_iter();
    let Some(anchor) = queue.next() else {
        return Vec::new();
    };
    let rest: Vec<SizedBubble> = queue.collect();

    let canvas = config.canvas_size;
    let center = canvas / 2.0;
    let mut placed: Vec<PlacedBubble> = Vec::with_capacity(rest.len() + 1);

    let anchor_offset = clamp_to_canvas(center - anchor.radius(), anchor.diameter, canvas);
    let first_ring = rest
        .first()
        .map(|next| anchor.radius() + next.radius() + config.ring_gap);
    placed.push(anchor.into_placed(anchor_offset, anchor_offset, false));
    let Some(mut ring_radius) = first_ring else {
        return placed;
    };

    let mut next = 0;
    let mut ring = 0;
    while next < rest.len() {
        let slots = ring_capacity(ring_radius, &rest[next..], config);
        let step = TAU / slots as f32;
        log::trace!("ring {ring}: radius {ring_radius:.1}, {slots} slots");

        let mut last_diameter = rest[next].diameter;
        for slot in 0..slots {
            let bubble = rest[next].clone();
            let candidate = place_on_ring(&bubble, slot, step, ring_radius, center, &placed, config);
            if !candidate.clear {
                log::debug!(
                    "bubble {} still overlaps after {} attempts on ring {ring}, keeping last position",
                    bubble.id,
                    candidate.attempts
                );
            }

            let x = clamp_to_canvas(candidate.x, bubble.diameter, canvas);
            let y = clamp_to_canvas(candidate.y, bubble.diameter, canvas);
            let (cx, cy) = (x + bubble.radius(), y + bubble.radius());
            let overlapped = overlaps_any(cx, cy, bubble.diameter, &placed);
            if overlapped && candidate.clear {
                log::debug!("bubble {} overlaps after clamping to the canvas", bubble.id);
            }

            last_diameter = bubble.diameter;
            placed.push(bubble.into_placed(x, y, overlapped));
            next += 1;
        }

        ring_radius += last_diameter + config.ring_gap;
        ring += 1;
    }

    placed
}

/// Number of slots on a ring of `radius`, never more than the bubbles left.
fn ring_capacity(radius: f32, remaining: &[SizedBubble], config: &PackConfig) -> usize {
    let circumference = TAU * radius;
    let average =
        remaining.iter().map(|bubble| bubble.diameter).sum::<f32>() / remaining.len() as f32;
    // Saturating cast: NaN and negatives become 0.
    let fits = (circumference / (average * config.ring_slack)).floor() as usize;
    fits.max(config.min_ring_slots).min(remaining.len()).max(1)
}

struct Candidate {
    x: f32,
    y: f32,
    attempts: usize,
    clear: bool,
}

fn place_on_ring(
    bubble: &SizedBubble,
    slot: usize,
    step: f32,
    ring_radius: f32,
    center: f32,
    placed: &[PlacedBubble],
    config: &PackConfig,
) -> Candidate {
    let attempts = config.max_attempts.max(1);
    let half = bubble.radius();
    let mut candidate = Candidate {
        x: center - half,
        y: center - half,
        attempts,
        clear: false,
    };
    for attempt in 0..attempts {
        let angle = slot as f32 * step + attempt as f32 * config.attempt_jitter;
        let cx = center + angle.cos() * ring_radius;
        let cy = center + angle.sin() * ring_radius;
        candidate.x = cx - half;
        candidate.y = cy - half;
        if !overlaps_any(cx, cy, bubble.diameter, placed) {
            candidate.attempts = attempt + 1;
            candidate.clear = true;
            break;
        }
    }
    candidate
}

fn overlaps_any(cx: f32, cy: f32, diameter: f32, placed: &[PlacedBubble]) -> bool {
    placed.iter().any(|other| {
        let (ox, oy) = other.center();
        circles_intersect(cx, cy, diameter, ox, oy, other.diameter)
    })
}

/// Keeps a `size`-wide box inside `[0, canvas]`. A box wider than the
/// canvas is pinned to 0.
fn clamp_to_canvas(value: f32, size: f32, canvas: f32) -> f32 {
    value.min(canvas - size).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(labels: &[Option<&str>]) -> Vec<BubbleItem> {
        labels
            .iter()
            .enumerate()
            .map(|(idx, label)| BubbleItem::new(format!("t{idx}"), label.map(str::to_string)))
            .collect()
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_input_packs_to_nothing() {
        assert!(pack(&[], DEFAULT_CANVAS_SIZE).is_empty());
    }

    #[test]
    fn single_bubble_is_centered() {
        let placed = pack(&items(&[Some("x")]), 280.0);
        assert_eq!(placed.len(), 1);
        let bubble = &placed[0];
        assert_eq!(bubble.id, "t0");
        assert_eq!(bubble.diameter, 60.0);
        assert_close(bubble.x, 140.0 - 30.0);
        assert_close(bubble.y, 140.0 - 30.0);
        assert!(!bubble.overlapped);
    }

    #[test]
    fn second_bubble_starts_at_angle_zero_of_first_ring() {
        let placed = pack(
            &items(&[Some("Ops"), Some("Provide mentoring to staff")]),
            280.0,
        );
        // The 100-wide bubble anchors the center even though it came second.
        assert_eq!(placed[0].id, "t1");
        assert_close(placed[0].x, 90.0);
        // Ring radius 50 + 30 + 20 = 100, slot 0 sits to the right.
        assert_eq!(placed[1].id, "t0");
        assert_close(placed[1].x, 140.0 + 100.0 - 30.0);
        assert_close(placed[1].y, 110.0);
        assert!(!placed[1].overlapped);
    }

    #[test]
    fn two_remaining_bubbles_split_the_ring() {
        let placed = pack(
            &items(&[Some("Provide mentoring to staff"), Some("A"), Some("B")]),
            280.0,
        );
        assert_eq!(placed.len(), 3);
        assert_close(placed[1].x, 210.0);
        assert_close(placed[2].x, 10.0);
        assert_close(placed[2].y, 110.0);
        assert!(placed.iter().all(|bubble| !bubble.overlapped));
    }

    #[test]
    fn output_is_sorted_by_descending_diameter_with_stable_ties() {
        let labels = [
            Some("Ops"),
            Some("Plan daily work"),
            None,
            Some("Coordinate cross-team planning"),
            Some("Budget"),
            Some("Review staff rosters"),
        ];
        let placed = pack(&items(&labels), 280.0);
        let diameters: Vec<f32> = placed.iter().map(|b| b.diameter).collect();
        assert!(diameters.windows(2).all(|pair| pair[0] >= pair[1]));
        let ids: Vec<&str> = placed.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["t3", "t1", "t5", "t0", "t2", "t4"]);
    }

    #[test]
    fn packing_is_deterministic() {
        let labels: Vec<Option<&str>> = vec![
            Some("Draft the quarterly workforce plan"),
            Some("Mentor"),
            Some("Run payroll"),
            Some("Update the training catalogue"),
            None,
            Some("Audit"),
            Some("Close open requisitions"),
            Some("Host onboarding"),
            Some("Refresh job descriptions"),
        ];
        let input = items(&labels);
        assert_eq!(pack(&input, 280.0), pack(&input, 280.0));
    }

    #[test]
    fn every_bubble_stays_inside_the_canvas() {
        let labels: Vec<Option<&str>> = (0..24)
            .map(|idx| match idx % 4 {
                0 => Some("Short"),
                1 => Some("Medium sized label"),
                2 => Some("A label that is long enough to be truncated"),
                _ => None,
            })
            .collect();
        for canvas in [180.0, 280.0, 400.0] {
            let placed = pack(&items(&labels), canvas);
            assert_eq!(placed.len(), labels.len());
            for bubble in &placed {
                assert!(bubble.x >= 0.0 && bubble.y >= 0.0, "{bubble:?}");
                assert!(bubble.x + bubble.diameter <= canvas + 1e-3, "{bubble:?}");
                assert!(bubble.y + bubble.diameter <= canvas + 1e-3, "{bubble:?}");
            }
        }
    }

    #[test]
    fn overlap_flag_matches_final_positions() {
        let labels: Vec<Option<&str>> = (0..16).map(|_| Some("Medium sized label")).collect();
        let placed = pack(&items(&labels), 200.0);
        let mut flagged = 0;
        for (idx, bubble) in placed.iter().enumerate() {
            let collides = placed[..idx].iter().any(|other| bubble.intersects(other));
            assert_eq!(bubble.overlapped, collides, "{}", bubble.id);
            flagged += usize::from(bubble.overlapped);
        }
        // Sixteen 80-wide bubbles cannot fit a 200 canvas.
        assert!(flagged > 0);
    }

    #[test]
    fn ids_survive_packing() {
        let input = items(&[Some("a"), Some("bb"), None, Some("dddd dddd dddd")]);
        let mut ids: Vec<String> = pack(&input, 280.0).into_iter().map(|b| b.id).collect();
        ids.sort();
        assert_eq!(ids, ["t0", "t1", "t2", "t3"]);
    }

    fn sized(diameter: f32) -> SizedBubble {
        SizedBubble {
            id: "mover".to_string(),
            label: None,
            diameter,
            scale: crate::layout::ScaleClass::Small,
        }
    }

    fn obstacle(cx: f32, cy: f32, diameter: f32) -> PlacedBubble {
        sized(diameter).into_placed(cx - diameter / 2.0, cy - diameter / 2.0, false)
    }

    #[test]
    fn blocked_slot_is_nudged_by_the_attempt_jitter() {
        let config = PackConfig::default();
        let (center, radius, step) = (140.0_f32, 100.0_f32, TAU / 6.0);
        // A 10-wide blocker on slot 1 keeps a 60-wide bubble off for 35 units
        // of arc: attempts 0..=3 collide, attempt 4 is the first clear one.
        let blocker = obstacle(center + step.cos() * radius, center + step.sin() * radius, 10.0);
        let candidate = place_on_ring(&sized(60.0), 1, step, radius, center, &[blocker], &config);
        assert!(candidate.clear);
        assert_eq!(candidate.attempts, 5);
        let angle = step + 4.0 * 0.1;
        assert_close(candidate.x, center + angle.cos() * radius - 30.0);
        assert_close(candidate.y, center + angle.sin() * radius - 30.0);
    }

    #[test]
    fn exhausted_attempts_keep_the_last_position() {
        let config = PackConfig::default();
        let (center, radius, step) = (140.0_f32, 100.0_f32, TAU / 6.0);
        let wall = obstacle(center, center, 400.0);
        let candidate = place_on_ring(&sized(60.0), 2, step, radius, center, &[wall], &config);
        assert!(!candidate.clear);
        assert_eq!(candidate.attempts, 10);
        let angle = 2.0 * step + 9.0 * 0.1;
        assert_close(candidate.x, center + angle.cos() * radius - 30.0);
        assert_close(candidate.y, center + angle.sin() * radius - 30.0);
    }

    #[test]
    fn ring_capacity_has_a_floor_and_a_ceiling() {
        let config = PackConfig::default();
        let big = SizedBubble {
            id: "big".to_string(),
            label: None,
            diameter: 100.0,
            scale: crate::layout::ScaleClass::Large,
        };
        let remaining = vec![big; 10];
        // 2π·50 / 130 rounds down to 2, lifted to the minimum of 6.
        assert_eq!(ring_capacity(50.0, &remaining, &config), 6);
        // 2π·300 / 130 = 14.5, capped by the 10 bubbles left.
        assert_eq!(ring_capacity(300.0, &remaining, &config), 10);
        assert_eq!(ring_capacity(50.0, &remaining[..3], &config), 3);
    }

    #[test]
    fn degenerate_canvas_pins_bubbles_to_the_origin() {
        let placed = pack(&items(&[Some("Plan daily work")]), 40.0);
        assert_eq!(placed[0].x, 0.0);
        assert_eq!(placed[0].y, 0.0);
    }
}
