use crate::types::NavIntent;

/// Map a tap position to an intent: left half is previous, right half
/// (midpoint included) is next.
pub fn intent_for_tap(x: f32, width: f32) -> NavIntent {
	if x < width / 2.0 {
		NavIntent::Previous
	} else {
		NavIntent::Next
	}
}

/// Apply boundary policy to an intent. Returns the index to enter, or
/// `None` when the intent is absorbed at a boundary: previous at index
/// 0 stays put, next at the last story stays put unless looping is
/// enabled, in which case it wraps to 0. Never closes the viewer.
pub fn apply_intent(
	intent: NavIntent,
	active_index: usize,
	len: usize,
	loop_enabled: bool,
) -> Option<usize> {
	match intent {
		NavIntent::Previous => active_index.checked_sub(1),
		NavIntent::Next => {
			if active_index + 1 < len {
				Some(active_index + 1)
			} else if loop_enabled && len > 0 {
				Some(0)
			} else {
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn left_half_is_previous_right_half_is_next() {
		assert_eq!(intent_for_tap(0.0, 400.0), NavIntent::Previous);
		assert_eq!(intent_for_tap(199.9, 400.0), NavIntent::Previous);
		assert_eq!(intent_for_tap(200.0, 400.0), NavIntent::Next);
		assert_eq!(intent_for_tap(399.0, 400.0), NavIntent::Next);
	}

	#[test]
	fn previous_clamps_at_zero() {
		assert_eq!(apply_intent(NavIntent::Previous, 0, 3, false), None);
		assert_eq!(apply_intent(NavIntent::Previous, 2, 3, false), Some(1));
	}

	#[test]
	fn next_stops_at_last_story() {
		assert_eq!(apply_intent(NavIntent::Next, 2, 3, false), None);
		assert_eq!(apply_intent(NavIntent::Next, 1, 3, false), Some(2));
	}

	#[test]
	fn next_wraps_when_looping() {
		assert_eq!(apply_intent(NavIntent::Next, 2, 3, true), Some(0));
		assert_eq!(apply_intent(NavIntent::Next, 0, 1, true), Some(0));
	}

	#[test]
	fn index_stays_in_bounds_under_arbitrary_taps() {
		for len in 1..=4usize {
			for loop_enabled in [false, true] {
				let mut index = 0usize;
				let taps = [
					NavIntent::Previous,
					NavIntent::Next,
					NavIntent::Next,
					NavIntent::Next,
					NavIntent::Next,
					NavIntent::Previous,
					NavIntent::Previous,
					NavIntent::Previous,
					NavIntent::Next,
				];
				for intent in taps {
					if let Some(next) = apply_intent(intent, index, len, loop_enabled) {
						index = next;
					}
					assert!(index < len, "index {} out of bounds for len {}", index, len);
				}
			}
		}
	}
}
