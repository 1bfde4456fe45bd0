//! Direction-aware child ordering for the bar's flex row.
//!
//! The bar is one flex row with `justify-content: space-between`, so visual
//! placement falls out of DOM order plus the document's text direction. This
//! module is the pure form of that branching: given a direction and the
//! configured timer side, produce the child order. The widget script and the
//! server-side preview both follow it.

use crate::models::TimerPosition;

/// Text direction of the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    /// Parse the host document's `dir` attribute; anything but "rtl" is LTR.
    pub fn from_dir_attr(attr: &str) -> Self {
        if attr.eq_ignore_ascii_case("rtl") {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }
}

/// The three top-level children of the bar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarChild {
    /// Image + message text + optional CTA.
    Message,
    /// The countdown row (only present when the bar has a deadline).
    Timer,
    /// The dismiss button.
    Close,
}

/// DOM order of the bar's children. The close control sits on the trailing
/// visual edge: first in DOM order under RTL, last under LTR. `Timer` precedes
/// `Message` exactly when `timer_position` is `Left`; callers with no deadline
/// simply skip the `Timer` entry when building.
pub fn layout_order(direction: Direction, timer_position: TimerPosition) -> [BarChild; 3] {
    let (first, second) = match timer_position {
        TimerPosition::Left => (BarChild::Timer, BarChild::Message),
        TimerPosition::Right => (BarChild::Message, BarChild::Timer),
    };
    match direction {
        Direction::Rtl => [BarChild::Close, first, second],
        Direction::Ltr => [first, second, BarChild::Close],
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use BarChild::*;

    #[test]
    fn ltr_orders() {
        assert_eq!(
            layout_order(Direction::Ltr, TimerPosition::Right),
            [Message, Timer, Close]
        );
        assert_eq!(
            layout_order(Direction::Ltr, TimerPosition::Left),
            [Timer, Message, Close]
        );
    }

    #[test]
    fn rtl_orders() {
        assert_eq!(
            layout_order(Direction::Rtl, TimerPosition::Right),
            [Close, Message, Timer]
        );
        assert_eq!(
            layout_order(Direction::Rtl, TimerPosition::Left),
            [Close, Timer, Message]
        );
    }

    #[test]
    fn close_is_always_on_the_trailing_visual_edge() {
        for pos in [TimerPosition::Left, TimerPosition::Right] {
            assert_eq!(layout_order(Direction::Ltr, pos)[2], Close);
            assert_eq!(layout_order(Direction::Rtl, pos)[0], Close);
        }
    }

    #[test]
    fn every_order_contains_each_child_once() {
        for dir in [Direction::Ltr, Direction::Rtl] {
            for pos in [TimerPosition::Left, TimerPosition::Right] {
                let order = layout_order(dir, pos);
                for child in [Message, Timer, Close] {
                    assert_eq!(order.iter().filter(|c| **c == child).count(), 1);
                }
            }
        }
    }

    #[test]
    fn dir_attr_parsing_defaults_to_ltr() {
        assert_eq!(Direction::from_dir_attr("rtl"), Direction::Rtl);
        assert_eq!(Direction::from_dir_attr("RTL"), Direction::Rtl);
        assert_eq!(Direction::from_dir_attr("ltr"), Direction::Ltr);
        assert_eq!(Direction::from_dir_attr(""), Direction::Ltr);
        assert_eq!(Direction::from_dir_attr("auto"), Direction::Ltr);
    }
}
