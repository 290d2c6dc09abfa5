//! Anchor declarations embedded in map and event notes.
//!
//! A note may contain any number of `DV_Anchor[...]` tags:
//!
//! | where | tag | meaning |
//! |---|---|---|
//! | event note | `DV_Anchor[id]` | follow this event at slot `id` |
//! | event note | `DV_Anchor[id, distance]` | same, explicit activation distance |
//! | map note | `DV_Anchor[id, eventId]` | follow event `eventId` at slot `id` |
//! | map note | `DV_Anchor[id, eventId, distance]` | same, explicit distance |
//! | map note | `DV_Anchor[fixed, id, x, y]` | fixed point at slot `id` |
//! | map note | `DV_Anchor[fixed, id, x, y, distance]` | same, explicit distance |
//!
//! Tags with any other argument count, or with unparsable numbers, are
//! ignored. A tag without a closing `]` ends the scan.

use crate::anchor::{Anchor, AnchorId, AnchorSource};
use crate::host::{EventId, ObjectKey};
use crate::point::Point;

pub const NOTE_PREFIX: &str = "DV_Anchor[";

const FIXED_KEYWORD: &str = "fixed";

/// One anchor registration read from a note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorDecl {
    pub id: AnchorId,
    pub source: AnchorSource,
    pub active_distance: Option<f64>,
}

impl AnchorDecl {
    pub fn into_anchor(self) -> Anchor {
        Anchor::new(self.source, self.active_distance)
    }
}

/// Extracts every anchor declaration from `note`.
///
/// `bound` is the object whose note this is (event notes); `None` for map
/// notes.
pub fn parse_note(note: &str, bound: Option<ObjectKey>) -> Vec<AnchorDecl> {
    let mut decls = Vec::new();
    let mut rest = note;

    while let Some(start) = rest.find(NOTE_PREFIX) {
        rest = &rest[start + NOTE_PREFIX.len()..];

        let Some(end) = rest.find(']') else {
            tracing::debug!("[note] Unterminated anchor tag, ignoring the rest of the note");
            break;
        };

        let params: Vec<&str> = rest[..end].split(',').map(str::trim).collect();
        rest = &rest[end + 1..];

        let decl = match bound {
            Some(target) => parse_bound(&params, target),
            None if params.first() == Some(&FIXED_KEYWORD) => parse_fixed(&params[1..]),
            None => parse_map_event(&params),
        };
        decls.extend(decl);
    }

    decls
}

fn parse_bound(params: &[&str], target: ObjectKey) -> Option<AnchorDecl> {
    let (id, active_distance) = match params {
        [id] => (parse_id(id)?, None),
        [id, distance] => (parse_id(id)?, Some(parse_number(distance)?)),
        _ => return None,
    };

    Some(AnchorDecl {
        id,
        source: AnchorSource::Object(target),
        active_distance,
    })
}

fn parse_map_event(params: &[&str]) -> Option<AnchorDecl> {
    let (id, event_id, active_distance) = match params {
        [id, event_id] => (parse_id(id)?, parse_event_id(event_id)?, None),
        [id, event_id, distance] => (
            parse_id(id)?,
            parse_event_id(event_id)?,
            Some(parse_number(distance)?),
        ),
        _ => return None,
    };

    Some(AnchorDecl {
        id,
        source: AnchorSource::MapEvent { event_id },
        active_distance,
    })
}

fn parse_fixed(params: &[&str]) -> Option<AnchorDecl> {
    let (id, x, y, active_distance) = match params {
        [id, x, y] => (parse_id(id)?, parse_number(x)?, parse_number(y)?, None),
        [id, x, y, distance] => (
            parse_id(id)?,
            parse_number(x)?,
            parse_number(y)?,
            Some(parse_number(distance)?),
        ),
        _ => return None,
    };

    Some(AnchorDecl {
        id,
        source: AnchorSource::Fixed(Point::new(x, y)),
        active_distance,
    })
}

fn parse_id(s: &str) -> Option<AnchorId> {
    s.parse().ok()
}

fn parse_event_id(s: &str) -> Option<EventId> {
    s.parse().ok()
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
