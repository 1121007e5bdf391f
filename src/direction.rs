use crate::{
    data::{Direction, Route, Sequence, Settings},
    window::ActiveWindow,
};

/// Effective traversal for one computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub forward: bool,
    pub base_sequence: Option<Sequence>,
}

/// Applies the manual settings, then lets a running service window override
/// them so the board follows the published direction of travel.
pub fn resolve(settings: &Settings, route: &Route, active: Option<&ActiveWindow>) -> Resolution {
    let mut resolution = Resolution {
        forward: !(settings.bidirectional_enabled
            && settings.display_direction == Direction::Backward),
        base_sequence: settings.display_base_stop_sequence,
    };

    let Some(active) = active.filter(|_| settings.constrain_to_today_slots) else {
        return resolution;
    };

    let Some((from_idx, from_stop)) = route.position_by_name(&active.window.from_location) else {
        log::debug!(
            "window origin {:?} is not on the route, keeping configured start",
            active.window.from_location
        );
        return resolution;
    };
    resolution.base_sequence = Some(from_stop.sequence);

    if settings.bidirectional_enabled {
        if let Some((to_idx, _)) = route.position_by_name(&active.window.to_location) {
            if to_idx != from_idx {
                resolution.forward = to_idx > from_idx;
            }
        }
    }

    resolution
}
