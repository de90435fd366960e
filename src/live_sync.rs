use crate::schedule::ScheduleEntry;

/// Fields a live match can overwrite on the current scenario. Batters and the
/// candidate bowler set stay whatever the operator last chose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioPatch {
    /// Resolved venue, or `None` when no known venue matched (the scenario
    /// venue is then left as-is).
    pub venue: Option<String>,
    pub innings: u8,
    pub over: u8,
}

const DEFAULT_OVER: u8 = 10;

/// Maps an in-progress schedule entry onto scenario fields.
///
/// Venue resolution compares known venue names case-insensitively against the
/// part of the feed's venue string before the first comma (the feed appends
/// the city, e.g. "Wankhede Stadium, Mumbai"). Innings comes from how many
/// score lines exist; the over is the floor of that innings' overs figure,
/// falling back to mid-innings when the feed has no usable number.
pub fn sync_from_live_match(entry: &ScheduleEntry, venue_candidates: &[String]) -> ScenarioPatch {
    let venue_head = entry
        .venue
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    let venue = venue_candidates
        .iter()
        .find(|candidate| {
            let candidate = candidate.trim().to_lowercase();
            !candidate.is_empty() && venue_head.contains(&candidate)
        })
        .cloned();

    let innings: u8 = if entry.score.len() > 1 { 2 } else { 1 };

    let over = entry
        .score
        .get(innings as usize - 1)
        .and_then(|line| line.overs)
        .filter(|overs| overs.is_finite() && *overs >= 0.0)
        .map(|overs| overs.floor() as u8)
        .unwrap_or(DEFAULT_OVER)
        .clamp(1, 20);

    ScenarioPatch {
        venue,
        innings,
        over,
    }
}
