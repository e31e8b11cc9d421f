/// Group label carried by one gene. Labels are interchangeable: only which
/// attendees share a label matters.
pub type GroupId = u16;

/// One gene per attendee position, each in `[0, group_count)`.
pub type Genome = Vec<GroupId>;

/// Fixed high reward for facilitator spread when the per-group counts have zero variance.
pub const FACILITATOR_SPREAD_MAX: f32 = 10.0;

/// Sessions smaller than this are not searched.
pub const MIN_ATTENDEES: usize = 3;
