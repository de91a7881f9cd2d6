use crate::library::{Direction, Track};

/// Something the user asked for. Each maps onto one catalog or player operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Refresh,
    Select(Track),
    TogglePlayPause,
    Advance(Direction),
    Restart,
    Quit,
}
